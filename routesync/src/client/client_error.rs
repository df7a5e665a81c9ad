use routesync_core::session::SessionError;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("no bearer token available, sign in again")]
    MissingToken,
    #[error("request to {url} failed: {source}")]
    RequestError { url: String, source: reqwest::Error },
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {url}: {message}")]
    DecodeError { url: String, message: String },
    #[error("route {route_id} has no drawable segments")]
    EmptyRoute { route_id: String },
    #[error("invalid route data: {source}")]
    InvalidRouteData {
        #[from]
        source: SessionError,
    },
    #[error("failed to build http client: {0}")]
    BuildError(String),
}

impl ClientError {
    /// true for a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::UnexpectedStatus { status: 404, .. })
    }
}
