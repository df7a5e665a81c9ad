//! route session model and reconciliation rules for the routesync driver client.
//!
//! this crate holds no I/O: the session manager in `routesync` feeds it backend
//! responses, stream events and position samples and acts on its decisions.
pub mod model;
pub mod session;
pub mod util;
