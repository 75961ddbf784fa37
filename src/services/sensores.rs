use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{leitura, Campo, Leitura};
use crate::error::AppError;
use crate::storage::Connector;

pub const DEFAULT_LATEST_LIMIT: u64 = 20;
pub const DEFAULT_SERIES_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

/// Fixed-width so that lexical order on the stored text equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Deserialize)]
pub struct NovaLeitura {
    pub campo_id: i32,
    pub umidade: f64,
    pub ph: f64,
    pub nutrientes: f64,
    #[serde(default)]
    pub temperatura: Option<f64>,
}

impl NovaLeitura {
    pub fn validate(&self) -> Result<(), AppError> {
        let values = [
            ("umidade", Some(self.umidade)),
            ("ph", Some(self.ph)),
            ("nutrientes", Some(self.nutrientes)),
            ("temperatura", self.temperatura),
        ];
        for (name, value) in values {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(AppError::validation(format!("{} must be a finite number", name)));
                }
            }
        }
        if !(0.0..=100.0).contains(&self.umidade) {
            return Err(AppError::validation("umidade must be between 0 and 100"));
        }
        if !(0.0..=14.0).contains(&self.ph) {
            return Err(AppError::validation("ph must be between 0 and 14"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PontoSerie {
    pub timestamp: String,
    pub umidade: f64,
    pub ph: f64,
    pub nutrientes: f64,
    pub temperatura: Option<f64>,
}

impl From<leitura::Model> for PontoSerie {
    fn from(l: leitura::Model) -> Self {
        Self {
            timestamp: l.timestamp,
            umidade: l.umidade,
            ph: l.ph,
            nutrientes: l.nutrientes,
            temperatura: l.temperatura,
        }
    }
}

/// Chronological (oldest first) points for one field.
#[derive(Debug, Clone, Serialize)]
pub struct Serie {
    pub campo_id: i32,
    pub pontos: Vec<PontoSerie>,
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Never earlier than the field's latest stored timestamp, even if the clock stepped back.
pub fn next_timestamp(now: String, previous: Option<&str>) -> String {
    match previous {
        Some(prev) if prev > now.as_str() => prev.to_string(),
        _ => now,
    }
}

pub fn check_limit(limit: u64) -> Result<u64, AppError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(limit)
}

pub async fn record(connector: &Connector, input: NovaLeitura) -> Result<leitura::Model, AppError> {
    input.validate()?;

    // Held until the row is in, so the next writer sees it as the previous reading.
    let guard = connector.lock_ledger().await;
    let handle = connector.acquire().await?;
    let result = insert_leitura(handle.conn(), input).await;
    handle.release().await;
    drop(guard);

    let leitura = result?;
    crate::metrics::increment_leituras_recorded();
    info!(
        campo_id = leitura.campo_id,
        leitura_id = leitura.id,
        "Sensor reading recorded"
    );
    Ok(leitura)
}

async fn insert_leitura(
    db: &DatabaseConnection,
    input: NovaLeitura,
) -> Result<leitura::Model, AppError> {
    if Campo::find_by_id(input.campo_id).one(db).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Campo {} not found",
            input.campo_id
        )));
    }

    let previous = latest_rows(db, input.campo_id, 1).await?;
    let timestamp = next_timestamp(
        format_timestamp(Utc::now().naive_utc()),
        previous.first().map(|l| l.timestamp.as_str()),
    );

    let new_leitura = leitura::ActiveModel {
        campo_id: Set(input.campo_id),
        umidade: Set(input.umidade),
        ph: Set(input.ph),
        nutrientes: Set(input.nutrientes),
        temperatura: Set(input.temperatura),
        timestamp: Set(timestamp),
        ..Default::default()
    };

    let inserted = Leitura::insert(new_leitura).exec(db).await?;
    let leitura = Leitura::find_by_id(inserted.last_insert_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("leitura {}", inserted.last_insert_id)))?;
    Ok(leitura)
}

/// Most recent first. Ties on timestamp fall back to insertion order.
async fn latest_rows(
    db: &DatabaseConnection,
    campo_id: i32,
    limit: u64,
) -> Result<Vec<leitura::Model>, DbErr> {
    Leitura::find()
        .filter(leitura::Column::CampoId.eq(campo_id))
        .order_by_desc(leitura::Column::Timestamp)
        .order_by_desc(leitura::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

pub async fn latest(
    connector: &Connector,
    campo_id: i32,
    limit: u64,
) -> Result<Vec<leitura::Model>, AppError> {
    let limit = check_limit(limit)?;
    let handle = connector.acquire().await?;
    let result = latest_rows(handle.conn(), campo_id, limit).await;
    handle.release().await;
    Ok(result?)
}

pub async fn series(connector: &Connector, campo_id: i32, limit: u64) -> Result<Serie, AppError> {
    let mut rows = latest(connector, campo_id, limit).await?;
    rows.reverse();
    Ok(Serie {
        campo_id,
        pontos: rows.into_iter().map(PontoSerie::from).collect(),
    })
}

pub async fn last(connector: &Connector, campo_id: i32) -> Result<Option<leitura::Model>, AppError> {
    Ok(latest(connector, campo_id, 1).await?.into_iter().next())
}
