use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use super::PubSubTransport;

pub const DEFAULT_SUBJECT: &str = "alert";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("alert topic not configured")]
    NotConfigured,
    #[error("alert transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub message: String,
}

/// Outbound delivery of one alert to a topic. Returns the transport's message id.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn publish(&self, topic: &str, alert: &Alert) -> Result<String, DispatchError>;
}

/// One-shot alert sender. No retries: a failed publish is reported to the caller.
#[derive(Clone)]
pub struct AlertDispatcher {
    topic: Option<String>,
    transport: Arc<dyn AlertTransport>,
}

impl AlertDispatcher {
    pub fn new(topic: Option<String>, transport: Arc<dyn AlertTransport>) -> Self {
        Self { topic, transport }
    }

    /// Pub/Sub-backed dispatcher. The client is created on first publish.
    pub fn pubsub(topic: Option<String>) -> Self {
        Self::new(topic, Arc::new(PubSubTransport::new()))
    }

    pub fn is_configured(&self) -> bool {
        self.topic.is_some()
    }

    pub async fn send(&self, message: &str, subject: &str) -> Result<(), DispatchError> {
        let topic = self.topic.as_deref().ok_or(DispatchError::NotConfigured)?;

        let alert = Alert {
            subject: subject.to_string(),
            message: message.to_string(),
        };
        match self.transport.publish(topic, &alert).await {
            Ok(message_id) => {
                info!(topic, message_id = %message_id, subject, "Alert published");
                crate::metrics::increment_alerts_sent();
                Ok(())
            }
            Err(e) => {
                error!(topic, "Failed to publish alert: {}", e);
                crate::metrics::increment_alerts_failed();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        published: Mutex<Vec<(String, Alert)>>,
        fail: bool,
    }

    #[async_trait]
    impl AlertTransport for Recording {
        async fn publish(&self, topic: &str, alert: &Alert) -> Result<String, DispatchError> {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), alert.clone()));
            if self.fail {
                Err(DispatchError::Transport("unreachable".into()))
            } else {
                Ok("msg-1".into())
            }
        }
    }

    #[tokio::test]
    async fn missing_topic_fails_without_touching_transport() {
        let transport = Arc::new(Recording::default());
        let dispatcher = AlertDispatcher::new(None, transport.clone());

        let err = dispatcher.send("Umidade baixa", DEFAULT_SUBJECT).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotConfigured));
        assert!(transport.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn publishes_message_and_subject_to_topic() {
        let transport = Arc::new(Recording::default());
        let dispatcher = AlertDispatcher::new(Some("farm-alerts".into()), transport.clone());

        dispatcher.send("pH fora da faixa", "Sensores").await.unwrap();

        let published = transport.published.lock().unwrap();
        assert_eq!(
            *published,
            vec![(
                "farm-alerts".to_string(),
                Alert {
                    subject: "Sensores".into(),
                    message: "pH fora da faixa".into(),
                }
            )]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced_once() {
        let transport = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let dispatcher = AlertDispatcher::new(Some("farm-alerts".into()), transport.clone());

        let err = dispatcher.send("x", DEFAULT_SUBJECT).await.unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
        assert_eq!(transport.published.lock().unwrap().len(), 1);
    }
}
