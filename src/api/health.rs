use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use crate::advisor::Advisor;
use crate::notifications::AlertDispatcher;

pub async fn health_check(
    Extension(advisor): Extension<Arc<Advisor>>,
    Extension(dispatcher): Extension<AlertDispatcher>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "api": "FarmTech",
        "modelo_carregado": advisor.is_loaded(),
        "alertas_configurados": dispatcher.is_configured(),
    }))
}
