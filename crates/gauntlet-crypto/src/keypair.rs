//! secp256k1 key pairs and signature verification.
//!
//! Keys are exchanged as base64: the private half is the raw 32-byte
//! scalar, the public half is the 33-byte SEC1 compressed point.
//! Signatures are SHA-256-with-ECDSA over the message bytes, encoded as
//! base64 of the 64-byte fixed-size form.
//!
//! # Example
//!
//! ```
//! use gauntlet_crypto::KeyPair;
//!
//! let keypair = KeyPair::generate();
//! let signature = keypair.sign("hello");
//! assert!(keypair.public_key().verify("hello", &signature));
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Length of a public key fingerprint in hex characters.
pub const PUBLIC_ID_LENGTH: usize = 20;

/// secp256k1 key pair for signing proofs.
#[derive(Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        Self { signing_key }
    }

    /// Create a key pair from a base64-encoded 32-byte private scalar.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid base64: {}", e)))?;

        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid private key: {}", e)))?;

        Ok(Self { signing_key })
    }

    /// Export the private scalar as base64.
    pub fn secret_key_base64(&self) -> String {
        BASE64.encode(self.signing_key.to_bytes())
    }

    /// Get the public half.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key().to_owned(),
        }
    }

    /// Fingerprint of the public key, usable as an agent identifier.
    pub fn fingerprint(&self) -> String {
        self.public_key().fingerprint()
    }

    /// Sign a message with SHA-256-with-ECDSA. Returns base64.
    pub fn sign(&self, data: &str) -> String {
        let signature: Signature = self.signing_key.sign(data.as_bytes());
        BASE64.encode(signature.to_bytes())
    }
}

/// Public key for verifying proofs.
#[derive(Debug, Clone)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Create from a base64-encoded SEC1 compressed point.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid base64: {}", e)))?;

        let verifying_key = VerifyingKey::from_sec1_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {}", e)))?;

        Ok(Self { verifying_key })
    }

    /// Export as base64 of the compressed point.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.verifying_key.to_encoded_point(true).as_bytes())
    }

    /// Deterministic fingerprint: SHA-256 over the compressed point,
    /// hex-encoded, truncated to [`PUBLIC_ID_LENGTH`] characters.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.verifying_key.to_encoded_point(true).as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(PUBLIC_ID_LENGTH);
        id
    }

    /// Verify a base64 signature against a message.
    ///
    /// Returns `false` on any malformed input or mismatch; never errors.
    pub fn verify(&self, data: &str, signature_b64: &str) -> bool {
        let bytes = match BASE64.decode(signature_b64) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let signature = match Signature::from_slice(&bytes) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        self.verifying_key
            .verify(data.as_bytes(), &signature)
            .is_ok()
    }
}

/// Verify a signature given a base64 public key.
///
/// Callers always get a boolean decision: malformed keys and signatures
/// verify as `false` rather than erroring.
pub fn verify(data: &str, signature_b64: &str, public_key_b64: &str) -> bool {
    match PublicKey::from_base64(public_key_b64) {
        Ok(public_key) => public_key.verify(data, signature_b64),
        Err(_) => false,
    }
}
