//! Error taxonomy shared by every bridge service.

use thiserror::Error;

/// Errors surfaced by the bridge core.
///
/// Validation, authentication and dispatch errors are reported to the caller
/// as-is. Upstream failures on the AI path are normally absorbed by the
/// simulation fallback before they reach this type.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ═══════════════════════════════════════════════════════════════════════════════
    // CALLER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════
    /// A required parameter is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// An intent was requested without a signed-in account.
    #[error("{0}")]
    Unauthenticated(String),

    /// The requested action is not part of the agent vocabulary.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    // ═══════════════════════════════════════════════════════════════════════════════
    // SERVICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════
    /// An operation ran before its service finished initialization.
    #[error("{0}")]
    NotInitialized(String),

    /// A live AI or chain call failed and no local recovery applied.
    #[error("upstream failure: {0}")]
    Upstream(String),

    // ═══════════════════════════════════════════════════════════════════════════════
    // AMBIENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BridgeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// True for errors caused by the request itself rather than the service.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Unauthenticated(_) | Self::UnknownAction(_)
        )
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_caller_facing() {
        assert_eq!(
            BridgeError::validation("Invalid amount").to_string(),
            "Invalid amount"
        );
        assert_eq!(
            BridgeError::UnknownAction("fly".into()).to_string(),
            "Unknown action: fly"
        );
    }

    #[test]
    fn test_caller_error_classification() {
        assert!(BridgeError::Unauthenticated("User must be signed in".into()).is_caller_error());
        assert!(!BridgeError::upstream("timeout").is_caller_error());
        assert!(!BridgeError::NotInitialized("x".into()).is_caller_error());
    }
}
