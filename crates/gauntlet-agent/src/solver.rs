//! The solving seam.
//!
//! Answering the puzzles takes intelligence this crate does not have —
//! an LLM, a human, a rules engine. The prover only cares that something
//! turns a prompt into free text before the deadline.

use async_trait::async_trait;
use thiserror::Error;

use gauntlet_core::ChallengeKind;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    Unavailable(String),

    #[error("Solver failed: {0}")]
    Failed(String),
}

/// External challenge solver invoked once per challenge.
///
/// Implementations may take arbitrarily long; the prover enforces the
/// batch deadline around the aggregate and cancels in-flight work when
/// the budget runs out.
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(
        &self,
        prompt: &str,
        nonce: &str,
        kind: ChallengeKind,
    ) -> Result<String, SolverError>;
}
