//! Periodic check of the latest reading of every field against agronomic limits.

use std::time::Duration;

use tracing::{error, info, warn, Instrument};

use crate::entities::leitura;
use crate::error::AppError;
use crate::notifications::{AlertDispatcher, NotificationTemplates};
use crate::services::{campos, sensores};
use crate::storage::Connector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Below this moisture (%) irrigation should be switched on.
    pub umidade_min: f64,
    pub ph_min: f64,
    pub ph_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            umidade_min: 30.0,
            ph_min: 6.0,
            ph_max: 7.0,
        }
    }
}

/// Human-readable findings for one reading; empty when everything is in range.
pub fn evaluate(leitura: &leitura::Model, limits: &Thresholds) -> Vec<String> {
    let mut findings = Vec::new();
    if leitura.umidade < limits.umidade_min {
        findings.push(NotificationTemplates::low_moisture(leitura.umidade));
    }
    if !(limits.ph_min..=limits.ph_max).contains(&leitura.ph) {
        findings.push(NotificationTemplates::ph_out_of_range(leitura.ph));
    }
    findings
}

/// One pass over all fields. Returns how many alerts were delivered.
pub async fn check_once(
    connector: &Connector,
    dispatcher: &AlertDispatcher,
    limits: &Thresholds,
) -> Result<usize, AppError> {
    let mut sent = 0;
    for campo in campos::list(connector).await? {
        let Some(ultima) = sensores::last(connector, campo.id).await? else {
            continue;
        };

        let findings = evaluate(&ultima, limits);
        if findings.is_empty() {
            continue;
        }

        let body = NotificationTemplates::sensor_alert(&campo.nome, &ultima.timestamp, &findings);
        match dispatcher
            .send(&body, NotificationTemplates::SENSOR_ALERT_SUBJECT)
            .await
        {
            Ok(()) => sent += 1,
            // One undeliverable alert must not hide the other fields.
            Err(e) => warn!(campo_id = campo.id, "Alert not delivered ({}): {}", e, body),
        }
    }
    Ok(sent)
}

pub async fn run(
    connector: &Connector,
    dispatcher: &AlertDispatcher,
    limits: Thresholds,
    interval: Duration,
) {
    info!(interval_secs = interval.as_secs(), "Sensor monitor started");
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let span = tracing::info_span!("sensor_check");
        match check_once(connector, dispatcher, &limits).instrument(span).await {
            Ok(0) => {}
            Ok(sent) => info!(sent, "Sensor alerts dispatched"),
            Err(e) => error!("Sensor check failed: {}", e),
        }
    }
}
