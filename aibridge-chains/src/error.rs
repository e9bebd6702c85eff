//! NEAR RPC errors.

use thiserror::Error;

use aibridge_common::BridgeError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("missing result in response")]
    MissingResult,

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        RpcError::Transport(err.to_string())
    }
}

impl From<RpcError> for BridgeError {
    fn from(err: RpcError) -> Self {
        BridgeError::Upstream(err.to_string())
    }
}
