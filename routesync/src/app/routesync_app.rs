use clap::Parser;

use super::{RouteSyncError, RouteSyncOperation};
use crate::client::ClientError;
use crate::config::RouteSyncConfiguration;

/// keeps a delivery driver's route in sync with the route service.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct RouteSyncApp {
    #[command(subcommand)]
    pub op: RouteSyncOperation,
    /// TOML or JSON configuration file. ROUTESYNC_* variables override it.
    #[arg(long, global = true)]
    pub config_file: Option<String>,
    /// id of the signed-in user
    #[arg(long, global = true, env = "ROUTESYNC_USER_ID")]
    pub user_id: Option<String>,
    /// bearer token of the signed-in user
    #[arg(long, global = true, env = "ROUTESYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// keep the session in memory instead of the store file
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,
}

/// identity used against the route service.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub user_id: String,
    pub token: String,
}

impl RouteSyncApp {
    pub async fn run(&self) -> Result<(), RouteSyncError> {
        self.op.run(self).await
    }

    pub fn configuration(&self) -> Result<RouteSyncConfiguration, RouteSyncError> {
        RouteSyncConfiguration::load(self.config_file.as_ref())
    }

    /// the bearer token. a missing or blank token is a [`ClientError::MissingToken`].
    pub fn token(&self) -> Result<String, RouteSyncError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or(RouteSyncError::ClientError(ClientError::MissingToken))
    }

    pub fn credentials(&self) -> Result<Credentials, RouteSyncError> {
        let user_id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .ok_or_else(|| {
                RouteSyncError::ConfigurationError(String::from(
                    "no user id, pass --user-id or set ROUTESYNC_USER_ID",
                ))
            })?;
        Ok(Credentials {
            user_id,
            token: self.token()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RouteSyncApp {
        RouteSyncApp::try_parse_from(args).expect("test invariant failed: arguments should parse")
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let app = parse(&[
            "routesync",
            "drive",
            "--user-id",
            "u1",
            "--token",
            "secret",
            "--ephemeral",
        ]);
        assert!(matches!(app.op, RouteSyncOperation::Drive));
        assert!(app.ephemeral);
        let credentials = app.credentials().expect("credentials should resolve");
        assert_eq!(
            credentials,
            Credentials {
                user_id: String::from("u1"),
                token: String::from("secret"),
            }
        );
    }

    #[test]
    fn test_monitor_requires_vehicle_id() {
        assert!(RouteSyncApp::try_parse_from(["routesync", "monitor"]).is_err());
        let app = parse(&["routesync", "monitor", "--vehicle-id", "v9"]);
        match app.op {
            RouteSyncOperation::Monitor { vehicle_id } => assert_eq!(vehicle_id, "v9"),
            _ => panic!("expected the monitor operation"),
        }
    }

    #[test]
    fn test_blank_token_is_missing() {
        let app = parse(&["routesync", "--user-id", "u1", "--token", "  ", "drive"]);
        assert!(matches!(
            app.credentials(),
            Err(RouteSyncError::ClientError(ClientError::MissingToken))
        ));
    }
}
