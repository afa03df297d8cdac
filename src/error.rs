//! Error types for domq operations.

use thiserror::Error;

/// Errors surfaced to callers.
///
/// Selector failures inside selections are logged and swallowed; only the
/// explicit [`Selector::parse`](crate::Selector::parse) reports them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("no content (HTTP 204) from {url}")]
    NoContent { url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} was aborted")]
    Aborted { url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timer step limit exceeded ({0} steps)")]
    TimerStepLimit(usize),
}

impl Error {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::NoContent { .. } => Some(204),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
