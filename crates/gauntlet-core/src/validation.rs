//! Shape validation for issued batches.
//!
//! Validation runs on the prover side before any solving starts: a batch
//! that fails here would be rejected by the verifier anyway, so failing
//! early saves the whole solve budget.

use thiserror::Error;

use crate::constants::BATCH_SIZE;
use crate::derive::derive_batch;
use crate::types::ChallengeBatch;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected {expected} challenges, got {got}")]
    WrongBatchSize { expected: usize, got: usize },

    #[error("Malformed nonce '{0}': must be hex of even length")]
    MalformedNonce(String),

    #[error("Challenge at position {position} carries index {got}")]
    IndexMismatch { position: usize, got: usize },

    #[error("Challenge {index} has an empty prompt")]
    EmptyPrompt { index: usize },
}

/// Validate a standard-sized batch.
pub fn validate_batch(batch: &ChallengeBatch) -> Result<(), ValidationError> {
    validate_batch_sized(batch, BATCH_SIZE)
}

/// Validate a batch against an explicit expected size (single-challenge
/// mode uses a degenerate batch of size 1).
pub fn validate_batch_sized(
    batch: &ChallengeBatch,
    expected: usize,
) -> Result<(), ValidationError> {
    if batch.challenges.len() != expected {
        return Err(ValidationError::WrongBatchSize {
            expected,
            got: batch.challenges.len(),
        });
    }

    let nonce = &batch.nonce;
    if nonce.is_empty()
        || nonce.len() % 2 != 0
        || !nonce.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(ValidationError::MalformedNonce(nonce.clone()));
    }

    for (position, challenge) in batch.challenges.iter().enumerate() {
        if challenge.index != position {
            return Err(ValidationError::IndexMismatch {
                position,
                got: challenge.index,
            });
        }
        if challenge.prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt { index: position });
        }
    }

    Ok(())
}

/// Cross-check an issued batch against local derivation.
///
/// Compares kind and seed slice per slot; prompt text is left out since
/// variant tables may differ across protocol revisions. A `false` return
/// means the issuer derives differently than this build — usually
/// protocol-version skew — and is worth surfacing before spending the
/// solve budget.
pub fn crosscheck_batch(batch: &ChallengeBatch) -> bool {
    let derived = match derive_batch(&batch.nonce, batch.challenges.len()) {
        Ok(derived) => derived,
        Err(_) => return false,
    };

    batch
        .challenges
        .iter()
        .zip(derived.iter())
        .all(|(got, want)| {
            got.kind == want.kind
                && got.variant_seed.eq_ignore_ascii_case(&want.variant_seed)
        })
}
