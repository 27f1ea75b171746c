use thiserror::Error;

use crate::storage::StorageError;

/// Every way an API call can fail.
///
/// `Display` is the human-readable message handed back to the caller; the
/// variant tells callers which class of failure it was when they care.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Response body had a shape the client cannot interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Server answered with an envelope whose `code` is not 200.
    #[error("{message}")]
    RequestRejected {
        code: serde_json::Value,
        message: String,
    },

    /// Non-2xx HTTP status.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    /// No response arrived.
    #[error("{0}")]
    Network(String),

    /// The request could not be built (bad URI, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
