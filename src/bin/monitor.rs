use farmtech_server::{
    config::Config,
    monitor::{self, Thresholds},
    notifications::AlertDispatcher,
    storage::Connector,
};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    farmtech_server::telemetry::init_telemetry("farmtech-monitor");

    let config = Config::from_env().expect("Invalid configuration");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Spawn metrics server
    tokio::spawn(async move {
        let app = axum::Router::new()
            .route(
                "/metrics",
                axum::routing::get(|| async move { metric_handle.render() }),
            )
            .layer(prometheus_layer);
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 9091));
        tracing::info!("Metrics server listening on {}", addr);
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app).await {
                    tracing::error!("Metrics server stopped: {}", e);
                }
            }
            Err(e) => tracing::error!("Metrics server could not bind {}: {}", addr, e),
        }
    });

    let connector = Connector::from_config(&config);
    let dispatcher = AlertDispatcher::pubsub(config.alert_topic.clone());
    if !dispatcher.is_configured() {
        tracing::warn!("ALERT_TOPIC not set, findings will be logged but not delivered");
    }

    tokio::select! {
        _ = monitor::run(&connector, &dispatcher, Thresholds::default(), config.monitor_interval) => {}
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => tracing::info!("Shutting down sensor monitor"),
            Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
        },
    }
}
