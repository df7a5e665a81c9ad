use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MqttTransport {
    #[default]
    Tcp,
    /// mqtt over websocket, `ws://host:port`
    Ws,
}

/// connection settings of the event broker.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct MqttConfiguration {
    pub host: String,
    pub port: u16,
    pub transport: MqttTransport,
    /// a random suffix is appended per connection.
    pub client_id_prefix: String,
    pub keep_alive_secs: u64,
}

impl Default for MqttConfiguration {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 1883,
            transport: MqttTransport::Tcp,
            client_id_prefix: String::from("routesync"),
            keep_alive_secs: 30,
        }
    }
}
