//! # Gauntlet Crypto
//!
//! Cryptographic primitives for the Gauntlet attestation protocol.
//!
//! This crate provides:
//! - secp256k1 key pairs with SHA-256-with-ECDSA signing
//! - Public key fingerprints used as agent identifiers
//! - Cryptographically secure nonce generation
//! - Constant-time comparison for secret material
//! - Canonical proof payload serialization (the exact signing input)
//!
//! ## Example
//!
//! ```
//! use gauntlet_crypto::{verify, KeyPair};
//!
//! let keypair = KeyPair::generate();
//! let signature = keypair.sign("attest: agent-7f3a");
//!
//! let public = keypair.public_key().to_base64();
//! assert!(verify("attest: agent-7f3a", &signature, &public));
//! assert!(!verify("attest: agent-0000", &signature, &public));
//! ```

mod canonical;
mod error;
mod keypair;
mod nonce;

pub use canonical::{proof_payload, to_canonical_string};
pub use error::CryptoError;
pub use keypair::{verify, KeyPair, PublicKey, PUBLIC_ID_LENGTH};
pub use nonce::{generate_nonce, safe_compare, NONCE_BYTES};
