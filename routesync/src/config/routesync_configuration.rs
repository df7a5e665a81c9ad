use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use routesync_core::session::{
    OffRouteConfig, ADMIN_RECALCULATION_COOLDOWN, DEFAULT_OFF_ROUTE_THRESHOLD_M,
};
use serde::{Deserialize, Serialize};

use super::MqttConfiguration;
use crate::app::RouteSyncError;

/// environment variables with this prefix override file values, for example
/// `ROUTESYNC_API_BASE_URL` or `ROUTESYNC_MQTT__HOST`.
pub const ENV_PREFIX: &str = "ROUTESYNC";

/// runtime settings of the driver client and the admin monitor.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct RouteSyncConfiguration {
    pub api_base_url: String,
    pub mqtt: MqttConfiguration,
    pub store_path: String,
    pub off_route_threshold_m: f64,
    pub arrival_radius_m: f64,
    pub driver_cooldown_secs: Option<u64>,
    pub admin_cooldown_secs: u64,
    pub heartbeat_interval_secs: u64,
    pub admin_poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for RouteSyncConfiguration {
    fn default() -> Self {
        Self {
            api_base_url: String::from("http://localhost:8080"),
            mqtt: MqttConfiguration::default(),
            store_path: String::from("routesync-session.json"),
            off_route_threshold_m: DEFAULT_OFF_ROUTE_THRESHOLD_M,
            arrival_radius_m: 50.0,
            driver_cooldown_secs: None,
            admin_cooldown_secs: ADMIN_RECALCULATION_COOLDOWN.as_secs(),
            heartbeat_interval_secs: 5,
            admin_poll_interval_secs: 3,
            request_timeout_secs: 15,
        }
    }
}

impl RouteSyncConfiguration {
    /// loads the configuration from an optional file, then applies
    /// `ROUTESYNC_*` environment overrides.
    pub fn load(file: Option<&String>) -> Result<RouteSyncConfiguration, RouteSyncError> {
        let mut builder = Config::builder();
        if let Some(f) = file {
            builder = builder.add_source(File::new(f, file_format(f)?));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                RouteSyncError::ConfigurationError(format!("failure reading configuration: {e}"))
            })?;
        config
            .try_deserialize::<RouteSyncConfiguration>()
            .map_err(|e| {
                RouteSyncError::ConfigurationError(format!("failure decoding configuration: {e}"))
            })
    }

    pub fn driver_off_route(&self) -> OffRouteConfig {
        OffRouteConfig {
            threshold_m: self.off_route_threshold_m,
            cooldown: self.driver_cooldown_secs.map(Duration::from_secs),
        }
    }

    pub fn admin_off_route(&self) -> OffRouteConfig {
        OffRouteConfig::admin(
            self.off_route_threshold_m,
            Duration::from_secs(self.admin_cooldown_secs),
        )
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn admin_poll_interval(&self) -> Duration {
        Duration::from_secs(self.admin_poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl TryFrom<&String> for RouteSyncConfiguration {
    type Error = RouteSyncError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        RouteSyncConfiguration::load(Some(f))
    }
}

fn file_format(f: &str) -> Result<FileFormat, RouteSyncError> {
    if f.ends_with(".toml") {
        Ok(FileFormat::Toml)
    } else if f.ends_with(".json") {
        Ok(FileFormat::Json)
    } else {
        Err(RouteSyncError::ConfigurationError(format!(
            "unsupported file type: {f}"
        )))
    }
}
