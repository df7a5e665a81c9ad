//! driver client for live route synchronization.
//!
//! keeps the driver's active delivery route consistent between the device
//! store, the route service (HTTP) and the route event stream (MQTT).
pub mod admin;
pub mod app;
pub mod client;
pub mod config;
pub mod session;
pub mod store;
pub mod stream;
