//! # Gauntlet Core
//!
//! Core types, challenge derivation, and the verifier contract for the
//! Gauntlet attestation protocol — a reverse CAPTCHA in which an
//! autonomous agent proves it holds a persistent cryptographic identity
//! and can clear a batch of short-lived puzzles inside a tight time
//! budget.
//!
//! This crate provides:
//! - The challenge/proof data model and its timing constants
//! - Stateless derivation of a challenge batch from a single nonce, so a
//!   fleet of verifier replicas reconstructs the exact puzzle set it
//!   issued without per-session state
//! - Batch shape validation and a local derivation cross-check
//! - The wire-level rules a compliant verifier enforces, as pure
//!   functions with an injectable clock
//!
//! ## Example
//!
//! ```
//! use gauntlet_core::{constants::BATCH_SIZE, derive_batch};
//!
//! let batch = derive_batch("9f86d081884c7d659a2feaa0c55ad015", BATCH_SIZE).unwrap();
//! assert_eq!(batch.len(), 7);
//!
//! // Any replica derives the identical batch from the nonce alone.
//! let again = derive_batch("9f86d081884c7d659a2feaa0c55ad015", BATCH_SIZE).unwrap();
//! assert_eq!(batch, again);
//! ```

pub mod constants;
pub mod contract;
pub mod derive;
pub mod error;
pub mod types;
pub mod validation;
pub mod version;

pub use contract::{check_submission, tally, ContractViolation, NonceLedger};
pub use derive::{derive_batch, DeriveError};
pub use error::ProtocolError;
pub use types::{
    ChallengeBatch, ChallengeDescriptor, ChallengeKind, Proof, VerificationResult,
};
pub use validation::{crosscheck_batch, validate_batch, validate_batch_sized, ValidationError};
pub use version::{ProtocolVersion, VersionError, PROTOCOL, PROTOCOL_VERSION};
