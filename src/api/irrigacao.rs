use std::sync::Arc;

use axum::{extract::Extension, Json};

use super::extract::ApiJson;
use crate::advisor::{Advisor, IrrigacaoRequest, IrrigacaoResponse};

// POST /api/irrigacao/recomendacao
pub async fn recomendacao_irrigacao(
    Extension(advisor): Extension<Arc<Advisor>>,
    ApiJson(payload): ApiJson<IrrigacaoRequest>,
) -> Json<IrrigacaoResponse> {
    let response = advisor.predict(&payload);
    tracing::Span::current().record("action", response.recomendacao.as_str());
    Json(response)
}
