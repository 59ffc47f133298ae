//! Umbrella error for protocol-level operations.

use thiserror::Error;

use crate::contract::ContractViolation;
use crate::derive::DeriveError;
use crate::validation::ValidationError;
use crate::version::VersionError;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Derivation error: {0}")]
    Derive(#[from] DeriveError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
