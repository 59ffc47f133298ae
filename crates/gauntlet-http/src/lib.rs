//! # Gauntlet HTTP
//!
//! HTTP transport for talking to a Gauntlet verification service.
//!
//! This crate provides:
//! - Wire DTOs for challenge issuance, proof submission, health, and the
//!   peer signature-verification utility
//! - A reqwest-based [`VerifierClient`]
//! - [`run_attestation`], the full fetch → prove → submit round-trip
//!
//! Transport security is the HTTP layer's job: point the client at an
//! `https://` base URL and TLS comes from reqwest. Retry and backoff
//! policy stay with the caller — transport errors propagate instead of
//! being swallowed, and a burned nonce needs a fresh batch anyway.
//!
//! ## Example
//!
//! ```ignore
//! use gauntlet_agent::Identity;
//! use gauntlet_http::{run_attestation, VerifierClient};
//!
//! let client = VerifierClient::new("https://verifier.example.com");
//! let identity = Identity::new("~/.gauntlet/identity.json");
//!
//! match run_attestation(&client, &identity, &my_solver).await? {
//!     outcome if outcome.is_verified() => println!("attested"),
//!     outcome => println!("not attested: {outcome:?}"),
//! }
//! ```

mod client;
mod error;
mod flow;
mod wire;

pub use client::VerifierClient;
pub use error::{AttestationError, TransportError};
pub use flow::{run_attestation, AttestationOutcome};
pub use wire::{ChallengeIssue, ErrorBody, HealthReply, IssuedChallenge, PeerVerifyReply, PeerVerifyRequest};
