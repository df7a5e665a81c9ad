mod mqtt_configuration;
mod routesync_configuration;

pub use mqtt_configuration::{MqttConfiguration, MqttTransport};
pub use routesync_configuration::{RouteSyncConfiguration, ENV_PREFIX};
