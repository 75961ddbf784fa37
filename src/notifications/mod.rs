pub mod dispatcher;
pub mod pubsub_client;
pub mod templates;

pub use dispatcher::{Alert, AlertDispatcher, AlertTransport, DispatchError, DEFAULT_SUBJECT};
pub use pubsub_client::PubSubTransport;
pub use templates::NotificationTemplates;
