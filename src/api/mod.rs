pub mod alertas;
pub mod campos;
pub mod extract;
pub mod health;
pub mod irrigacao;
pub mod sensores;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::advisor::Advisor;
use crate::notifications::AlertDispatcher;
use crate::storage::Connector;

/// Shared dependencies handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub connector: Arc<Connector>,
    pub advisor: Arc<Advisor>,
    pub dispatcher: AlertDispatcher,
}

impl AppContext {
    pub fn new(connector: Connector, advisor: Advisor, dispatcher: AlertDispatcher) -> Self {
        Self {
            connector: Arc::new(connector),
            advisor: Arc::new(advisor),
            dispatcher,
        }
    }
}

/// Routes of the public API. Transport layers (tracing, CORS, metrics) are added by the binary.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/campos",
            get(campos::list_campos).post(campos::create_campo),
        )
        .route("/api/campos/:id/insumos", get(campos::get_insumos))
        .route("/api/sensores/registrar", post(sensores::registrar_leitura))
        .route("/api/sensores/ultimas", get(sensores::ultimas_leituras))
        .route("/api/sensores/serie", get(sensores::serie_temporal))
        .route(
            "/api/irrigacao/recomendacao",
            post(irrigacao::recomendacao_irrigacao),
        )
        .route("/api/alertas/teste", post(alertas::alerta_teste))
        .layer(Extension(ctx.connector))
        .layer(Extension(ctx.advisor))
        .layer(Extension(ctx.dispatcher))
}
