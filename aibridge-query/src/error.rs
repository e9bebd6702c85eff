//! Transport errors of the NEAR AI backend.

use aibridge_common::BridgeError;
use thiserror::Error;

/// Failure of a single live backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Request(err.to_string())
        }
    }
}

impl From<BackendError> for BridgeError {
    fn from(err: BackendError) -> Self {
        BridgeError::Upstream(err.to_string())
    }
}
