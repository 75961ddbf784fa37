use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::extract::{ApiJson, ApiPath};
use crate::error::AppError;
use crate::services::campos::{self, NovoCampo};
use crate::storage::Connector;

// POST /api/campos
pub async fn create_campo(
    Extension(connector): Extension<Arc<Connector>>,
    ApiJson(payload): ApiJson<NovoCampo>,
) -> Result<Response, AppError> {
    let span = tracing::Span::current();
    span.record("table", "campos");
    span.record("action", "create");

    let campo = campos::create(&connector, payload).await?;
    span.record("campo_id", campo.id);
    Ok((StatusCode::CREATED, Json(campo)).into_response())
}

// GET /api/campos
pub async fn list_campos(
    Extension(connector): Extension<Arc<Connector>>,
) -> Result<Response, AppError> {
    let campos = campos::list(&connector).await?;
    Ok((StatusCode::OK, Json(campos)).into_response())
}

// GET /api/campos/:id/insumos
pub async fn get_insumos(
    Extension(connector): Extension<Arc<Connector>>,
    ApiPath(campo_id): ApiPath<i32>,
) -> Result<Response, AppError> {
    tracing::Span::current().record("campo_id", campo_id);
    let estimate = campos::insumos(&connector, campo_id).await?;
    Ok((StatusCode::OK, Json(estimate)).into_response())
}
