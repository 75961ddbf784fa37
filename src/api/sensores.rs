use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::services::sensores::{self, NovaLeitura, DEFAULT_LATEST_LIMIT, DEFAULT_SERIES_LIMIT};
use crate::storage::Connector;

#[derive(Debug, Deserialize)]
pub struct LeiturasQuery {
    pub campo_id: i32,
    pub limit: Option<u64>,
}

// POST /api/sensores/registrar
pub async fn registrar_leitura(
    Extension(connector): Extension<Arc<Connector>>,
    ApiJson(payload): ApiJson<NovaLeitura>,
) -> Result<Response, AppError> {
    let span = tracing::Span::current();
    span.record("table", "leituras_sensores");
    span.record("action", "create");
    span.record("campo_id", payload.campo_id);

    let leitura = sensores::record(&connector, payload).await?;
    Ok((StatusCode::CREATED, Json(leitura)).into_response())
}

// GET /api/sensores/ultimas?campo_id=&limit=
pub async fn ultimas_leituras(
    Extension(connector): Extension<Arc<Connector>>,
    ApiQuery(query): ApiQuery<LeiturasQuery>,
) -> Result<Response, AppError> {
    tracing::Span::current().record("campo_id", query.campo_id);
    let limit = query.limit.unwrap_or(DEFAULT_LATEST_LIMIT);
    let leituras = sensores::latest(&connector, query.campo_id, limit).await?;
    Ok((StatusCode::OK, Json(leituras)).into_response())
}

// GET /api/sensores/serie?campo_id=&limit=
pub async fn serie_temporal(
    Extension(connector): Extension<Arc<Connector>>,
    ApiQuery(query): ApiQuery<LeiturasQuery>,
) -> Result<Response, AppError> {
    tracing::Span::current().record("campo_id", query.campo_id);
    let limit = query.limit.unwrap_or(DEFAULT_SERIES_LIMIT);
    let serie = sensores::series(&connector, query.campo_id, limit).await?;
    Ok((StatusCode::OK, Json(serie)).into_response())
}
