mod heartbeat;
mod mqtt_channel;
mod pub_sub;
mod route_event;
mod stream_error;
mod subscriber;

pub mod topic;

#[cfg(test)]
pub(crate) mod test_support;

pub use heartbeat::{publish_position, PositionReport};
pub use mqtt_channel::{ChannelEvent, MqttChannel, MqttEvents};
pub use pub_sub::{IncomingMessage, PubSubChannel};
pub use route_event::decode_route_event;
pub use stream_error::StreamError;
pub use subscriber::{EventSubscriber, SubscriptionState};
