mod client_error;
mod http_backend;
pub(crate) mod id_codec;
mod realpath;
mod route_backend;

pub mod dto;

pub use client_error::ClientError;
pub use http_backend::HttpBackend;
pub use realpath::{load_route_segments, VIRTUAL_NODE_NAME};
pub use route_backend::RouteBackend;

#[cfg(test)]
pub(crate) mod test_support;
