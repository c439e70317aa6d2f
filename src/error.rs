use thiserror::Error;

/// Failure of a remote catalog request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error fetching '{url}': {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("HTTP error fetching '{url}': {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Unexpected response from '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// True for failures where the remote never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Failed to serialize stored value: {0}")]
    Serialize(String),
}

#[derive(Debug, Error)]
pub enum CineScoutError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<CineScoutError> for String {
    fn from(err: CineScoutError) -> Self {
        err.to_string()
    }
}
