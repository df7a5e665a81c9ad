use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};

use super::{IncomingMessage, PubSubChannel, StreamError};
use crate::config::{MqttConfiguration, MqttTransport};

const REQUEST_CHANNEL_CAPACITY: usize = 32;

/// [`PubSubChannel`] backed by an MQTT broker. messages are read from the
/// paired [`MqttEvents`], which must be polled for the channel to make
/// progress.
#[derive(Clone)]
pub struct MqttChannel {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
}

/// what the connection reported on one poll.
#[derive(Debug)]
pub enum ChannelEvent {
    Connected,
    Message(IncomingMessage),
    /// acknowledgements, pings and other protocol traffic.
    Other,
}

pub struct MqttEvents {
    event_loop: EventLoop,
    connected: Arc<AtomicBool>,
}

impl MqttChannel {
    pub fn connect(conf: &MqttConfiguration) -> (MqttChannel, MqttEvents) {
        let client_id = format!(
            "{}-{}-{}",
            conf.client_id_prefix,
            std::process::id(),
            chrono::Utc::now().timestamp_millis()
        );
        let mut options = match conf.transport {
            MqttTransport::Tcp => MqttOptions::new(client_id, conf.host.clone(), conf.port),
            MqttTransport::Ws => {
                let url = format!("ws://{}:{}/mqtt", conf.host, conf.port);
                let mut options = MqttOptions::new(client_id, url, conf.port);
                options.set_transport(Transport::Ws);
                options
            }
        };
        options.set_keep_alive(Duration::from_secs(conf.keep_alive_secs.max(5)));
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
        let connected = Arc::new(AtomicBool::new(false));
        log::info!(
            "connecting to mqtt broker {}:{} over {:?}",
            conf.host,
            conf.port,
            conf.transport
        );
        let channel = MqttChannel {
            client,
            connected: connected.clone(),
        };
        (
            channel,
            MqttEvents {
                event_loop,
                connected,
            },
        )
    }
}

impl MqttEvents {
    /// drives the connection until the next event. a failure marks the
    /// channel disconnected; polling again reconnects.
    pub async fn next(&mut self) -> Result<ChannelEvent, StreamError> {
        match self.event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                self.connected.store(true, Ordering::SeqCst);
                log::info!("mqtt connected");
                Ok(ChannelEvent::Connected)
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                Ok(ChannelEvent::Message(IncomingMessage {
                    topic: publish.topic,
                    payload: publish.payload.to_vec(),
                    retained: publish.retain,
                }))
            }
            Ok(_) => Ok(ChannelEvent::Other),
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(StreamError::from(e))
            }
        }
    }
}

#[async_trait]
impl PubSubChannel for MqttChannel {
    async fn subscribe(&self, topic: &str) -> Result<(), StreamError> {
        log::debug!("subscribing to {topic}");
        self.client.subscribe(topic, QoS::AtLeastOnce).await?;
        Ok(())
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), StreamError> {
        log::debug!("unsubscribing from {topic}");
        self.client.unsubscribe(topic).await?;
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), StreamError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StreamError> {
        self.connected.store(false, Ordering::SeqCst);
        self.client.disconnect().await?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
