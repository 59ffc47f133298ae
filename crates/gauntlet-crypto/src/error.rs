//! Error types for Gauntlet crypto primitives.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("Canonical encoding does not allow floats; use integers or strings")]
    FloatNotAllowed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
