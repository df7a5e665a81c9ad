use routesync_core::session::SessionError;

use crate::client::ClientError;
use crate::store::StoreError;
use crate::stream::StreamError;

#[derive(thiserror::Error, Debug)]
pub enum RouteSyncError {
    #[error(transparent)]
    SessionError(#[from] SessionError),
    #[error(transparent)]
    StoreError(#[from] StoreError),
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    StreamError(#[from] StreamError),
    #[error("invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading commands: {0}")]
    InputError(#[from] std::io::Error),
}
