//! Proof orchestration.
//!
//! Takes an issued batch from BATCH_RECEIVED through SOLVING to SIGNED:
//! validate the shape, cross-check derivation, collect solutions under
//! the response deadline, then sign the canonical payload. Submission
//! itself belongs to the transport; a spent nonce is terminal either way,
//! so there are no retries here.

use chrono::Utc;
use tokio::time::timeout;

use gauntlet_core::constants::BATCH_SIZE;
use gauntlet_core::{
    crosscheck_batch, validate_batch_sized, ChallengeBatch, ChallengeDescriptor, ChallengeKind,
    Proof, VerificationResult,
};
use gauntlet_crypto::proof_payload;

use crate::error::AgentError;
use crate::identity::Identity;
use crate::solver::Solver;

/// Terminal protocol verdict for one submitted proof.
///
/// Transport failures are not represented here: they surface as errors
/// from the transport layer, so callers can always tell "the verifier
/// said no" from "the verifier was unreachable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Verified(VerificationResult),
    Rejected(VerificationResult),
}

impl Outcome {
    pub fn from_result(result: VerificationResult) -> Self {
        if result.verified {
            Outcome::Verified(result)
        } else {
            Outcome::Rejected(result)
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified(_))
    }
}

/// Builds signed proofs for an injected [`Identity`].
pub struct Prover<'a> {
    identity: &'a Identity,
}

impl<'a> Prover<'a> {
    pub fn new(identity: &'a Identity) -> Self {
        Self { identity }
    }

    /// Solve and sign a standard batch.
    ///
    /// Solutions are collected sequentially under one wall-clock budget
    /// ending at the batch's response deadline. If the budget runs out,
    /// in-flight solving is cancelled and no partial proof is produced —
    /// the verifier would reject a late submission no matter how correct
    /// it is.
    pub async fn prove_batch(
        &self,
        batch: &ChallengeBatch,
        solver: &dyn Solver,
    ) -> Result<Proof, AgentError> {
        self.prove_sized(batch, solver, BATCH_SIZE).await
    }

    /// Solve and sign a single externally-supplied challenge.
    ///
    /// Single mode is a degenerate batch of size 1 pushed through the
    /// same validation, timing, and signing path as a full batch.
    pub async fn prove_single(
        &self,
        batch: &ChallengeBatch,
        solver: &dyn Solver,
    ) -> Result<Proof, AgentError> {
        self.prove_sized(batch, solver, 1).await
    }

    async fn prove_sized(
        &self,
        batch: &ChallengeBatch,
        solver: &dyn Solver,
        expected: usize,
    ) -> Result<Proof, AgentError> {
        validate_batch_sized(batch, expected)?;

        if expected == BATCH_SIZE && !crosscheck_batch(batch) {
            // Not fatal: variant tables drift across revisions, but skew
            // here usually means prover and verifier disagree on the
            // protocol version
            tracing::warn!(
                nonce = %batch.nonce,
                "issued batch does not match local derivation"
            );
        }

        self.identity.init().await?;

        let budget = (batch.response_deadline() - Utc::now())
            .to_std()
            .map_err(|_| AgentError::DeadlineExpired)?;

        tracing::debug!(
            nonce = %batch.nonce,
            challenges = batch.challenges.len(),
            budget_ms = budget.as_millis() as u64,
            "solving challenge batch"
        );

        let solutions = timeout(budget, solve_all(batch, solver))
            .await
            .map_err(|_| AgentError::DeadlineExpired)??;

        let timestamp = Utc::now().timestamp_millis();
        let public_id = self.identity.public_id().await?;
        let payload = proof_payload(&batch.nonce, &solutions.join("\n"), &public_id, timestamp);
        let signature = self.identity.sign(&payload).await?;

        tracing::debug!(nonce = %batch.nonce, %public_id, "proof signed");

        Ok(Proof {
            nonce: batch.nonce.clone(),
            public_id,
            timestamp,
            solutions,
            signature,
        })
    }
}

/// Wrap one externally-supplied challenge as a degenerate batch.
pub fn single_challenge_batch(
    prompt: &str,
    nonce: &str,
    kind: ChallengeKind,
    issued_at: chrono::DateTime<Utc>,
) -> ChallengeBatch {
    ChallengeBatch::new(
        nonce.to_string(),
        vec![ChallengeDescriptor {
            index: 0,
            kind,
            prompt: prompt.to_string(),
            variant_seed: String::new(),
        }],
        issued_at,
    )
}

async fn solve_all(batch: &ChallengeBatch, solver: &dyn Solver) -> Result<Vec<String>, AgentError> {
    let mut solutions = Vec::with_capacity(batch.challenges.len());
    for challenge in &batch.challenges {
        let answer = solver
            .solve(&challenge.prompt, &batch.nonce, challenge.kind)
            .await?;
        solutions.push(answer);
    }
    Ok(solutions)
}
