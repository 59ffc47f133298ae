//! The verifier contract.
//!
//! The remote verifier is not implemented here, but the rules it must
//! enforce are: the prover's correctness argument leans on them, and
//! integration tests need a compliant judge to run against. Everything in
//! this module is pure — the clock is an argument, never read from the
//! system — so verifier replicas and tests reach identical decisions.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

use gauntlet_crypto::safe_compare;

use crate::types::{ChallengeBatch, Proof, VerificationResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("Proof nonce does not match the issued batch")]
    NonceMismatch,

    #[error("Batch expired at {expired_at}")]
    BatchExpired { expired_at: DateTime<Utc> },

    #[error("Proof landed {late_by_ms}ms past the response deadline")]
    DeadlineExceeded { late_by_ms: i64 },

    #[error("Expected {expected} solutions, got {got}")]
    SolutionCount { expected: usize, got: usize },

    #[error("Proof signature does not verify")]
    BadSignature,

    #[error("Nonce has already been spent")]
    NonceReplayed,
}

/// Enforce every wire-level rule on one submitted proof.
///
/// `now` is the arrival instant as observed by the verifier. Order
/// matters only in that timing is checked before the signature: a late
/// proof is rejected without paying for signature verification.
pub fn check_submission(
    batch: &ChallengeBatch,
    proof: &Proof,
    public_key_b64: &str,
    now: DateTime<Utc>,
) -> Result<(), ContractViolation> {
    if !safe_compare(&batch.nonce, &proof.nonce) {
        return Err(ContractViolation::NonceMismatch);
    }

    let expires_at = batch.expires_at();
    if now > expires_at {
        return Err(ContractViolation::BatchExpired { expired_at: expires_at });
    }

    // Both the claimed submission time and the observed arrival must make
    // the deadline; a correct-but-late proof is rejected regardless.
    let deadline_ms = batch.response_deadline().timestamp_millis();
    let claimed_late = proof.timestamp - deadline_ms;
    let arrived_late = now.timestamp_millis() - deadline_ms;
    let late_by_ms = claimed_late.max(arrived_late);
    if late_by_ms > 0 {
        return Err(ContractViolation::DeadlineExceeded { late_by_ms });
    }

    if proof.solutions.len() != batch.challenges.len() {
        return Err(ContractViolation::SolutionCount {
            expected: batch.challenges.len(),
            got: proof.solutions.len(),
        });
    }

    if !gauntlet_crypto::verify(&proof.payload(), &proof.signature, public_key_b64) {
        return Err(ContractViolation::BadSignature);
    }

    Ok(())
}

/// Fold per-challenge grading into a verification result.
pub fn tally(pass_flags: &[bool], required: usize) -> VerificationResult {
    let pass_count = pass_flags.iter().filter(|&&passed| passed).count();
    VerificationResult {
        verified: pass_count >= required,
        pass_count,
        required,
    }
}

/// Single-use nonce registry.
///
/// Nonces are the replay key: one nonce binds one challenge batch to one
/// verification attempt, ever. This in-memory ledger is the reference
/// behavior; a replica fleet would back it with shared storage.
#[derive(Debug, Default)]
pub struct NonceLedger {
    spent: HashSet<String>,
}

impl NonceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a nonce for one verification attempt.
    ///
    /// Returns `false` if the nonce was already spent; the submission
    /// must then be rejected as a replay.
    pub fn claim(&mut self, nonce: &str) -> bool {
        self.spent.insert(nonce.to_string())
    }

    pub fn is_spent(&self, nonce: &str) -> bool {
        self.spent.contains(nonce)
    }
}
