//! The full verification round-trip.

use gauntlet_agent::{AgentError, Identity, Outcome, Prover, Solver};
use gauntlet_core::VerificationResult;

use crate::client::VerifierClient;
use crate::error::AttestationError;

/// Terminal result of one attestation attempt.
///
/// `Expired` means the solve budget ran out before submission. The nonce
/// is burned either way — retrying means fetching a fresh batch, and that
/// decision belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationOutcome {
    Verified(VerificationResult),
    Rejected(VerificationResult),
    Expired,
}

impl AttestationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, AttestationOutcome::Verified(_))
    }
}

/// Fetch a challenge batch, prove it, and submit the proof.
///
/// Protocol-level outcomes (verified, rejected, expired) come back as
/// [`AttestationOutcome`]; transport and agent failures come back as
/// errors, so callers can pick a retry policy without guessing which
/// kind of failure they saw.
pub async fn run_attestation(
    client: &VerifierClient,
    identity: &Identity,
    solver: &dyn Solver,
) -> Result<AttestationOutcome, AttestationError> {
    let batch = client.fetch_challenge().await?;

    let proof = match Prover::new(identity).prove_batch(&batch, solver).await {
        Ok(proof) => proof,
        Err(AgentError::DeadlineExpired) => {
            tracing::info!(nonce = %batch.nonce, "solve budget exhausted before submission");
            return Ok(AttestationOutcome::Expired);
        }
        Err(err) => return Err(err.into()),
    };

    let result = client.submit_proof(&proof).await?;
    tracing::info!(
        nonce = %batch.nonce,
        verified = result.verified,
        pass_count = result.pass_count,
        required = result.required,
        "verifier judged proof"
    );

    Ok(match Outcome::from_result(result) {
        Outcome::Verified(result) => AttestationOutcome::Verified(result),
        Outcome::Rejected(result) => AttestationOutcome::Rejected(result),
    })
}
