// ---------------------------------------------------------------------------
// SyncError: typed errors for backend calls
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur talking to the placement backend.
///
/// All of them resolve to the same local recovery: roll back the optimistic
/// overrides of the failed commit and release the lock.
#[derive(Debug)]
pub enum SyncError {
    /// Transport-level failure (DNS, connection refused, TLS).
    Transport(String),
    /// The request did not complete within the client timeout.
    Timeout,
    /// The backend answered with a non-success status.
    Rejected { status: u16, message: String },
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Transport(msg) => write!(f, "network error: {msg}"),
            SyncError::Timeout => write!(f, "request timed out"),
            SyncError::Rejected { status, message } => {
                if message.is_empty() {
                    write!(f, "rejected by server (HTTP {status})")
                } else {
                    write!(f, "rejected by server: {message}")
                }
            }
            SyncError::Decode(msg) => write!(f, "invalid server response: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout
        } else if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}
