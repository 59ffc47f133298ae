//! Transport and round-trip error types.
//!
//! Transport failures are kept apart from protocol rejections: a
//! rejection comes back as a [`gauntlet_core::VerificationResult`]
//! inside a successful response, while anything in this module means the
//! round-trip itself broke and the host decides whether to retry.

use thiserror::Error;

use gauntlet_agent::AgentError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Verifier returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// Errors from the full fetch → prove → submit round-trip.
#[derive(Debug, Error)]
pub enum AttestationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}
