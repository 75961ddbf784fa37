use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::notifications::{AlertDispatcher, NotificationTemplates, DEFAULT_SUBJECT};

// POST /api/alertas/teste
pub async fn alerta_teste(
    Extension(dispatcher): Extension<AlertDispatcher>,
) -> Result<Json<Value>, AppError> {
    tracing::Span::current().record("action", "test_alert");
    dispatcher
        .send(NotificationTemplates::TEST_ALERT_MESSAGE, DEFAULT_SUBJECT)
        .await?;
    Ok(Json(json!({"status": "enviado"})))
}
