use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{PubSubChannel, StreamError};

/// channel that records every request and always succeeds.
#[derive(Debug)]
pub struct RecordingChannel {
    subscribed: Mutex<Vec<String>>,
    unsubscribed: Mutex<Vec<String>>,
    published: Mutex<Vec<(String, Vec<u8>)>>,
    connected: AtomicBool,
}

impl Default for RecordingChannel {
    fn default() -> Self {
        RecordingChannel {
            subscribed: Mutex::new(vec![]),
            unsubscribed: Mutex::new(vec![]),
            published: Mutex::new(vec![]),
            connected: AtomicBool::new(true),
        }
    }
}

impl RecordingChannel {
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscribed.lock().expect("test lock").clone()
    }

    pub fn unsubscriptions(&self) -> Vec<String> {
        self.unsubscribed.lock().expect("test lock").clone()
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().expect("test lock").clone()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl PubSubChannel for RecordingChannel {
    async fn subscribe(&self, topic: &str) -> Result<(), StreamError> {
        self.subscribed
            .lock()
            .expect("test lock")
            .push(topic.to_string());
        Ok(())
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), StreamError> {
        self.unsubscribed
            .lock()
            .expect("test lock")
            .push(topic.to_string());
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), StreamError> {
        self.published
            .lock()
            .expect("test lock")
            .push((topic.to_string(), payload));
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StreamError> {
        self.set_connected(false);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
