use async_trait::async_trait;

use super::StreamError;

/// a message delivered by the broker on one of our subscriptions.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retained: bool,
}

/// the publish/subscribe channel, at-least-once in both directions.
#[async_trait]
pub trait PubSubChannel: Send + Sync {
    async fn subscribe(&self, topic: &str) -> Result<(), StreamError>;

    async fn unsubscribe(&self, topic: &str) -> Result<(), StreamError>;

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), StreamError>;

    async fn disconnect(&self) -> Result<(), StreamError>;

    /// true between a connection acknowledgement and the next failure.
    fn is_connected(&self) -> bool;
}
