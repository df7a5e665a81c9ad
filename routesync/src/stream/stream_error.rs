#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("mqtt client request failed: {source}")]
    ClientError {
        #[from]
        source: rumqttc::ClientError,
    },
    #[error("mqtt connection failed: {source}")]
    ConnectionError {
        #[from]
        source: rumqttc::ConnectionError,
    },
    #[error("topic '{0}' is not a route event topic")]
    UnexpectedTopic(String),
    #[error("malformed route event payload: {0}")]
    MalformedPayload(String),
    #[error("failure encoding message: {source}")]
    EncodeError {
        #[from]
        source: serde_json::Error,
    },
}
