use std::collections::HashMap;

use async_trait::async_trait;
use google_cloud_googleapis::pubsub::v1::PubsubMessage;
use google_cloud_pubsub::client::{Client, ClientConfig};
use tokio::sync::OnceCell;

use super::{Alert, AlertTransport, DispatchError};

/// Publishes alerts on Google Cloud Pub/Sub. The subject travels as the
/// `subject` message attribute, the message text as the payload.
#[derive(Default)]
pub struct PubSubTransport {
    client: OnceCell<Client>,
}

impl PubSubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client(&self) -> Result<&Client, DispatchError> {
        self.client
            .get_or_try_init(|| async {
                let config = ClientConfig::default()
                    .with_auth()
                    .await
                    .map_err(|e| DispatchError::Transport(format!("Pub/Sub auth: {}", e)))?;
                Client::new(config)
                    .await
                    .map_err(|e| DispatchError::Transport(format!("Pub/Sub client: {}", e)))
            })
            .await
    }
}

#[async_trait]
impl AlertTransport for PubSubTransport {
    async fn publish(&self, topic: &str, alert: &Alert) -> Result<String, DispatchError> {
        let client = self.client().await?;
        let mut publisher = client.topic(topic).new_publisher(None);

        let message = PubsubMessage {
            data: alert.message.clone().into_bytes(),
            attributes: HashMap::from([("subject".to_string(), alert.subject.clone())]),
            ..Default::default()
        };

        let awaiter = publisher.publish(message).await;
        let result = awaiter
            .get()
            .await
            .map_err(|status| DispatchError::Transport(status.to_string()));
        publisher.shutdown().await;
        result
    }
}
