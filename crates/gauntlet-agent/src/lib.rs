//! # Gauntlet Agent
//!
//! The prover side of the Gauntlet attestation protocol: a persistent
//! cryptographic identity plus the orchestration that turns an issued
//! challenge batch into a signed proof inside the response budget.
//!
//! The solving intelligence itself lives behind the [`Solver`] trait —
//! an LLM, a human, or a scripted stand-in in tests. This crate only
//! enforces the clock and the signature.
//!
//! ## Example
//!
//! ```ignore
//! use gauntlet_agent::{Identity, Prover};
//!
//! let identity = Identity::new("~/.gauntlet/identity.json");
//! let prover = Prover::new(&identity);
//!
//! let proof = prover.prove_batch(&batch, &my_solver).await?;
//! // hand `proof` to the transport, interpret the verifier's verdict
//! ```

mod error;
mod identity;
mod prover;
mod solver;

pub use error::AgentError;
pub use identity::{Identity, LoadOutcome, PublicIdentity};
pub use prover::{single_challenge_batch, Outcome, Prover};
pub use solver::{Solver, SolverError};
