//! Irrigation recommendation on top of a pre-trained classifier.
//!
//! The advisor is built once at startup and shared read-only. It is either
//! [`Advisor::Unloaded`] (no artifact available) or [`Advisor::Loaded`]; it never
//! moves between the two afterwards.

pub mod artifact;
pub mod classifier;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub use artifact::ModelLoadError;
pub use classifier::{Classifier, InferenceError, Model, ProbabilisticClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recomendacao {
    Irrigar,
    NaoIrrigar,
    ModeloNaoTreinado,
    ErroInterno,
}

impl Recomendacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recomendacao::Irrigar => "irrigar",
            Recomendacao::NaoIrrigar => "nao_irrigar",
            Recomendacao::ModeloNaoTreinado => "modelo_nao_treinado",
            Recomendacao::ErroInterno => "erro_interno",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IrrigacaoRequest {
    pub umidade: f64,
    pub ph: f64,
    pub nutrientes: f64,
    /// Accepted but not part of the model's feature vector.
    #[serde(default)]
    pub temperatura: Option<f64>,
}

impl IrrigacaoRequest {
    /// Feature order the classifier was trained with.
    pub fn features(&self) -> [f64; 3] {
        [self.umidade, self.ph, self.nutrientes]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigacaoResponse {
    pub recomendacao: Recomendacao,
    pub probabilidade: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum Advisor {
    Unloaded,
    Loaded(Model),
}

impl Advisor {
    /// A missing artifact leaves the advisor unloaded; an unreadable or invalid
    /// one is an error.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        match artifact::load(path)? {
            Some(model) => {
                info!(path = %path.display(), ?model, "Irrigation model loaded");
                Ok(Advisor::Loaded(model))
            }
            None => {
                warn!(path = %path.display(), "Irrigation model not found, recommendations disabled");
                Ok(Advisor::Unloaded)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Advisor::Loaded(_))
    }

    pub fn predict(&self, request: &IrrigacaoRequest) -> IrrigacaoResponse {
        let response = match self {
            Advisor::Unloaded => IrrigacaoResponse {
                recomendacao: Recomendacao::ModeloNaoTreinado,
                probabilidade: None,
            },
            Advisor::Loaded(model) => match model.infer(&request.features()) {
                Ok((class, probabilidade)) => IrrigacaoResponse {
                    recomendacao: if class == 1 {
                        Recomendacao::Irrigar
                    } else {
                        Recomendacao::NaoIrrigar
                    },
                    probabilidade,
                },
                Err(e) => {
                    error!("Irrigation inference failed: {}", e);
                    IrrigacaoResponse {
                        recomendacao: Recomendacao::ErroInterno,
                        probabilidade: Some(0.0),
                    }
                }
            },
        };
        crate::metrics::increment_recommendations(response.recomendacao.as_str());
        response
    }
}
