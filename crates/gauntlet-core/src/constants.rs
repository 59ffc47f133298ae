//! Protocol tuning constants.
//!
//! These values are shared between prover and verifier: the verifier
//! derives expiry and deadline from `issuedAt` plus the constants, and the
//! prover derives the same instants locally from the issued batch.

/// Number of challenges in one batch.
pub const BATCH_SIZE: usize = 7;

/// Lifetime of an issued batch in milliseconds. After this the batch is
/// unusable regardless of how fast the prover answers.
pub const CHALLENGE_EXPIRY_MS: u64 = 60_000;

/// Hard response budget in milliseconds. A proof submitted later than
/// `issuedAt + MAX_RESPONSE_TIME_MS` is rejected even if every answer is
/// correct.
pub const MAX_RESPONSE_TIME_MS: u64 = 6_000;

/// Default number of challenges that must pass for a proof to verify.
pub const MIN_PASS_COUNT: usize = 7;

/// Per-index stride into the nonce when deriving seed slices.
pub const SEED_OFFSET_MULTIPLIER: usize = 7;

/// Length in hex characters of each derived seed slice.
pub const SEED_HEX_SLICE: usize = 4;

pub use gauntlet_crypto::{NONCE_BYTES, PUBLIC_ID_LENGTH};
