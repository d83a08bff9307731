use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Errors surfaced by the remote store.
///
/// `NotFound` gets its own variant because callers distinguish "the record is
/// gone" (e.g. an edit target deleted out from under us) from any other
/// unexpected status, which lands in `Http` with the raw status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404 — the requested record does not exist.
    NotFound,

    /// The server returned a non-2xx status other than 404.
    Http { status: u16, body: String },

    /// The request never completed (DNS, connect, timeout, I/O).
    Network(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "record not found"),
            ApiError::Http { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "HTTP {status}")
                } else {
                    write!(f, "HTTP {status}: {body}")
                }
            }
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
