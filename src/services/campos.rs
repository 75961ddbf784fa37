use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agronomy;
use crate::entities::{campo, Campo};
use crate::error::AppError;
use crate::storage::Connector;

#[derive(Debug, Clone, Deserialize)]
pub struct NovoCampo {
    pub nome: String,
    pub cultura: String,
    pub largura: f64,
    pub comprimento: f64,
}

impl NovoCampo {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::validation("nome must not be empty"));
        }
        if self.cultura.trim().is_empty() {
            return Err(AppError::validation("cultura must not be empty"));
        }
        for (name, value) in [("largura", self.largura), ("comprimento", self.comprimento)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::validation(format!(
                    "{} must be a positive number of meters",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsumosResponse {
    pub campo_id: i32,
    pub cultura: String,
    pub area_m2: f64,
    #[serde(flatten)]
    pub estimativa: agronomy::Estimativa,
}

pub async fn create(connector: &Connector, input: NovoCampo) -> Result<campo::Model, AppError> {
    input.validate()?;

    let handle = connector.acquire().await?;
    let result = insert_campo(handle.conn(), input).await;
    handle.release().await;

    let campo = result?;
    crate::metrics::increment_campos_created();
    info!(campo_id = campo.id, cultura = %campo.cultura, "Field registered");
    Ok(campo)
}

async fn insert_campo(db: &DatabaseConnection, input: NovoCampo) -> Result<campo::Model, DbErr> {
    let area_m2 = input.largura * input.comprimento;
    let new_campo = campo::ActiveModel {
        nome: Set(input.nome),
        cultura: Set(input.cultura),
        largura: Set(input.largura),
        comprimento: Set(input.comprimento),
        area_m2: Set(area_m2),
        ..Default::default()
    };

    let inserted = Campo::insert(new_campo).exec(db).await?;
    Campo::find_by_id(inserted.last_insert_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("campo {}", inserted.last_insert_id)))
}

/// All fields, most recently created first.
pub async fn list(connector: &Connector) -> Result<Vec<campo::Model>, AppError> {
    let handle = connector.acquire().await?;
    let result = Campo::find()
        .order_by_desc(campo::Column::Id)
        .all(handle.conn())
        .await;
    handle.release().await;
    Ok(result?)
}

pub async fn get(connector: &Connector, id: i32) -> Result<Option<campo::Model>, AppError> {
    let handle = connector.acquire().await?;
    let result = Campo::find_by_id(id).one(handle.conn()).await;
    handle.release().await;
    Ok(result?)
}

pub async fn insumos(connector: &Connector, id: i32) -> Result<InsumosResponse, AppError> {
    let campo = get(connector, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campo {} not found", id)))?;

    let estimativa = agronomy::estimate(&campo.cultura, campo.area_m2)
        .map_err(|e| AppError::validation(e.to_string()))?;

    Ok(InsumosResponse {
        campo_id: campo.id,
        cultura: campo.cultura,
        area_m2: campo.area_m2,
        estimativa,
    })
}
