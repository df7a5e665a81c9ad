use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failure reading session store {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure writing session store {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure encoding session store: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
