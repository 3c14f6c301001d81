use std::path::PathBuf;

/// Errors raised by the file-backed conversation store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Invalid conversation id: '{0}'")]
    InvalidId(String),

    #[error("Failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse conversation file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
