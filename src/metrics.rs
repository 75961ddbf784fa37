use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

use crate::entities::{Campo, Leitura};
use crate::storage::Connector;

pub async fn init_metrics(connector: &Connector) {
    let handle = match connector.acquire().await {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Skipping metrics bootstrap: {}", e);
            return;
        }
    };

    let (campo_count, leitura_count) = match table_counts(handle.conn()).await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::warn!("Skipping metrics bootstrap, count query failed: {}", e);
            handle.release().await;
            return;
        }
    };
    metrics::gauge!("farmtech_campos_total").set(campo_count as f64);
    metrics::gauge!("farmtech_leituras_total").set(leitura_count as f64);

    tracing::info!(
        backend = handle.backend().as_str(),
        "Initialized metrics: Campos={}, Leituras={}",
        campo_count,
        leitura_count
    );
    handle.release().await;
}

async fn table_counts(db: &DatabaseConnection) -> Result<(u64, u64), DbErr> {
    let campos = Campo::find().count(db).await?;
    let leituras = Leitura::find().count(db).await?;
    Ok((campos, leituras))
}

pub fn increment_campos_created() {
    metrics::gauge!("farmtech_campos_total").increment(1.0);
}

pub fn increment_leituras_recorded() {
    metrics::gauge!("farmtech_leituras_total").increment(1.0);
}

pub fn increment_recommendations(outcome: &str) {
    metrics::counter!("farmtech_irrigation_recommendations_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn increment_alerts_sent() {
    metrics::counter!("farmtech_alerts_sent_total").increment(1);
}

pub fn increment_alerts_failed() {
    metrics::counter!("farmtech_alerts_failed_total").increment(1);
}

pub fn increment_storage_fallbacks() {
    metrics::counter!("farmtech_storage_fallbacks_total").increment(1);
}
