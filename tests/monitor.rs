//! One monitor pass over several fields against a local store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use farmtech_server::monitor::{self, Thresholds};
use farmtech_server::notifications::{
    Alert, AlertDispatcher, AlertTransport, DispatchError, NotificationTemplates,
};
use farmtech_server::services::campos::{self, NovoCampo};
use farmtech_server::services::sensores::{self, NovaLeitura};
use farmtech_server::storage::Connector;
use tempfile::TempDir;

/// Records every publish attempt; the first one fails.
#[derive(Default)]
struct FlakyTransport {
    attempts: Mutex<Vec<Alert>>,
}

#[async_trait]
impl AlertTransport for FlakyTransport {
    async fn publish(&self, _topic: &str, alert: &Alert) -> Result<String, DispatchError> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(alert.clone());
        if attempts.len() == 1 {
            return Err(DispatchError::Transport("unavailable".into()));
        }
        Ok(format!("msg-{}", attempts.len()))
    }
}

async fn campo_with_reading(connector: &Connector, nome: &str, reading: Option<(f64, f64)>) {
    let campo = campos::create(
        connector,
        NovoCampo {
            nome: nome.to_string(),
            cultura: "soja".to_string(),
            largura: 10.0,
            comprimento: 10.0,
        },
    )
    .await
    .unwrap();

    if let Some((umidade, ph)) = reading {
        sensores::record(
            connector,
            NovaLeitura {
                campo_id: campo.id,
                umidade,
                ph,
                nutrientes: 1.0,
                temperatura: None,
            },
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn pass_alerts_each_field_with_findings_and_survives_a_failed_delivery() {
    let tmp = TempDir::new().unwrap();
    let connector = Connector::new(None, "require", tmp.path().join("farm.db"));

    // Fields are visited newest first.
    campo_with_reading(&connector, "Seco", Some((12.0, 6.5))).await;
    campo_with_reading(&connector, "Saudavel", Some((50.0, 6.5))).await;
    campo_with_reading(&connector, "Vazio", None).await;
    campo_with_reading(&connector, "Acido", Some((50.0, 5.0))).await;

    let transport = Arc::new(FlakyTransport::default());
    let dispatcher = AlertDispatcher::new(Some("farm-alerts".into()), transport.clone());

    let sent = monitor::check_once(&connector, &dispatcher, &Thresholds::default())
        .await
        .unwrap();
    assert_eq!(sent, 1);

    let attempts = transport.attempts.lock().unwrap();
    assert_eq!(attempts.len(), 2);
    assert!(attempts
        .iter()
        .all(|a| a.subject == NotificationTemplates::SENSOR_ALERT_SUBJECT));

    assert!(attempts[0].message.contains("'Acido'"));
    assert!(attempts[0].message.contains("pH fora da faixa ideal (5.00)"));
    assert!(!attempts[0].message.contains("Umidade baixa"));

    assert!(attempts[1].message.contains("'Seco'"));
    assert!(attempts[1].message.contains("Umidade baixa (12.0%)"));
    assert!(!attempts[1].message.contains("pH fora"));
}

#[tokio::test]
async fn pass_without_topic_publishes_nothing() {
    let tmp = TempDir::new().unwrap();
    let connector = Connector::new(None, "require", tmp.path().join("farm.db"));
    campo_with_reading(&connector, "Seco", Some((5.0, 4.0))).await;

    let transport = Arc::new(FlakyTransport::default());
    let dispatcher = AlertDispatcher::new(None, transport.clone());

    let sent = monitor::check_once(&connector, &dispatcher, &Thresholds::default())
        .await
        .unwrap();
    assert_eq!(sent, 0);
    assert!(transport.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn pass_over_empty_registry_sends_nothing() {
    let tmp = TempDir::new().unwrap();
    let connector = Connector::new(None, "require", tmp.path().join("farm.db"));
    campo_with_reading(&connector, "Vazio", None).await;

    let transport = Arc::new(FlakyTransport::default());
    let dispatcher = AlertDispatcher::new(Some("farm-alerts".into()), transport.clone());

    let sent = monitor::check_once(&connector, &dispatcher, &Thresholds::default())
        .await
        .unwrap();
    assert_eq!(sent, 0);
    assert!(transport.attempts.lock().unwrap().is_empty());
}
