mod drive;
mod monitor;
mod operation;
mod routesync_app;
mod routesync_error;

pub use drive::DriverCommand;
pub use operation::RouteSyncOperation;
pub use routesync_app::{Credentials, RouteSyncApp};
pub use routesync_error::RouteSyncError;
