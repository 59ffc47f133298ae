//! Data model for challenges, proofs, and verification results.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::constants::{CHALLENGE_EXPIRY_MS, MAX_RESPONSE_TIME_MS, MIN_PASS_COUNT};

/// Fixed enumeration of puzzle categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeKind {
    Math,
    Logic,
    Extraction,
    Counting,
    Transformation,
    MultiStep,
    Pattern,
    Analysis,
}

impl ChallengeKind {
    /// Every registered kind, in derivation order. The derivation
    /// algorithm reduces seed values modulo this table's length.
    pub const ALL: [ChallengeKind; 8] = [
        ChallengeKind::Math,
        ChallengeKind::Logic,
        ChallengeKind::Extraction,
        ChallengeKind::Counting,
        ChallengeKind::Transformation,
        ChallengeKind::MultiStep,
        ChallengeKind::Pattern,
        ChallengeKind::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeKind::Math => "math",
            ChallengeKind::Logic => "logic",
            ChallengeKind::Extraction => "extraction",
            ChallengeKind::Counting => "counting",
            ChallengeKind::Transformation => "transformation",
            ChallengeKind::MultiStep => "multi-step",
            ChallengeKind::Pattern => "pattern",
            ChallengeKind::Analysis => "analysis",
        }
    }
}

impl Display for ChallengeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One puzzle inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDescriptor {
    /// Position in the batch, `0..batch_size`.
    pub index: usize,

    #[serde(rename = "type")]
    pub kind: ChallengeKind,

    /// The puzzle text handed to the solver.
    #[serde(rename = "promptText")]
    pub prompt: String,

    /// The hex seed slice this descriptor was derived from. Doubles as an
    /// anti-caching salt: answers cannot be precomputed before the nonce
    /// is issued.
    #[serde(rename = "variantSeed")]
    pub variant_seed: String,
}

/// An issued batch of challenges, bound to a single-use nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeBatch {
    /// Shared seed for the whole batch. Single-use by construction.
    pub nonce: String,

    pub challenges: Vec<ChallengeDescriptor>,

    /// When the verifier minted the nonce.
    pub issued_at: DateTime<Utc>,
}

impl ChallengeBatch {
    pub fn new(nonce: String, challenges: Vec<ChallengeDescriptor>, issued_at: DateTime<Utc>) -> Self {
        Self {
            nonce,
            challenges,
            issued_at,
        }
    }

    /// Instant after which the batch is unusable.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::milliseconds(CHALLENGE_EXPIRY_MS as i64)
    }

    /// Hard submission cutoff. A proof must land before this instant or
    /// the verifier rejects it regardless of answer correctness.
    pub fn response_deadline(&self) -> DateTime<Utc> {
        self.issued_at + Duration::milliseconds(MAX_RESPONSE_TIME_MS as i64)
    }
}

/// A signed response to a challenge batch.
///
/// Constructed once per submission attempt and immutable thereafter. The
/// signature covers the canonical payload built from the joined solution
/// set, not one signature per challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub nonce: String,

    /// Fingerprint of the prover's public key.
    pub public_id: String,

    /// Submission time, milliseconds since epoch.
    pub timestamp: i64,

    /// Free-text answers, ordered parallel to the batch's challenges.
    pub solutions: Vec<String>,

    /// Base64 signature over [`Proof::payload`].
    pub signature: String,
}

impl Proof {
    /// The solution set as the single joined string that gets signed.
    pub fn joined_solutions(&self) -> String {
        self.solutions.join("\n")
    }

    /// Reconstruct the exact canonical byte stream the signature covers.
    pub fn payload(&self) -> String {
        gauntlet_crypto::proof_payload(
            &self.nonce,
            &self.joined_solutions(),
            &self.public_id,
            self.timestamp,
        )
    }
}

/// Outcome reported by a verifier for one submitted proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    pub pass_count: usize,

    /// How many challenges had to pass. Defaults to the full batch unless
    /// the verifier is configured more leniently.
    #[serde(default = "default_required")]
    pub required: usize,
}

fn default_required() -> usize {
    MIN_PASS_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChallengeKind::MultiStep).unwrap(),
            "\"multi-step\""
        );
        assert_eq!(serde_json::to_string(&ChallengeKind::Math).unwrap(), "\"math\"");
    }

    #[test]
    fn test_descriptor_wire_names() {
        let descriptor = ChallengeDescriptor {
            index: 0,
            kind: ChallengeKind::Pattern,
            prompt: "next number".to_string(),
            variant_seed: "a1b2".to_string(),
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "pattern");
        assert_eq!(json["promptText"], "next number");
        assert_eq!(json["variantSeed"], "a1b2");
    }

    #[test]
    fn test_batch_deadlines() {
        let issued_at = Utc::now();
        let batch = ChallengeBatch::new("ab".to_string(), vec![], issued_at);

        assert_eq!(
            batch.response_deadline() - issued_at,
            Duration::milliseconds(6_000)
        );
        assert_eq!(batch.expires_at() - issued_at, Duration::milliseconds(60_000));
    }

    #[test]
    fn test_proof_joined_solutions() {
        let proof = Proof {
            nonce: "ff".to_string(),
            public_id: "id".to_string(),
            timestamp: 1,
            solutions: vec!["42".to_string(), "paris".to_string()],
            signature: String::new(),
        };

        assert_eq!(proof.joined_solutions(), "42\nparis");
        assert!(proof.payload().contains("\"solution\":\"42\\nparis\""));
    }

    #[test]
    fn test_verification_result_required_defaults() {
        let result: VerificationResult =
            serde_json::from_str(r#"{"verified":true,"passCount":7}"#).unwrap();
        assert_eq!(result.required, MIN_PASS_COUNT);
        assert_eq!(result.pass_count, 7);
    }
}
