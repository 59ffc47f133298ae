//! Error types for the agent crate.
//!
//! Timing failures get their own variant so callers can tell an expired
//! attempt (fetch a fresh batch and retry) from a genuine fault.

use std::path::PathBuf;
use thiserror::Error;

use crate::solver::SolverError;
use gauntlet_core::ValidationError;
use gauntlet_crypto::CryptoError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Identity store {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Batch rejected before solving: {0}")]
    InvalidBatch(#[from] ValidationError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Response deadline passed before all solutions were collected")]
    DeadlineExpired,

    #[error("Identity serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
