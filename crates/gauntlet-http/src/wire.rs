//! Wire DTOs for the verifier's HTTP API.
//!
//! Field names here are the protocol's camelCase spelling; the core types
//! carry the same spelling, so a [`gauntlet_core::Proof`] serializes
//! directly as the submission body without an adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gauntlet_core::{derive_batch, ChallengeBatch, ChallengeDescriptor, ChallengeKind};

/// Challenge issuance response.
///
/// Expiry and response deadline are not on the wire: the caller derives
/// them locally from `issuedAt` plus the shared protocol constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeIssue {
    pub nonce: String,
    pub challenges: Vec<IssuedChallenge>,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedChallenge {
    pub index: usize,

    #[serde(rename = "type")]
    pub kind: ChallengeKind,

    #[serde(rename = "promptText")]
    pub prompt: String,

    /// Some issuers include the seed slice; it is recomputable from the
    /// nonce either way.
    #[serde(rename = "variantSeed", default, skip_serializing_if = "Option::is_none")]
    pub variant_seed: Option<String>,
}

impl ChallengeIssue {
    /// Convert into the core batch type, filling in any seed slices the
    /// issuer left off the wire from local derivation.
    pub fn into_batch(self) -> ChallengeBatch {
        let derived = derive_batch(&self.nonce, self.challenges.len()).unwrap_or_default();

        let challenges = self
            .challenges
            .into_iter()
            .map(|challenge| {
                let variant_seed = challenge
                    .variant_seed
                    .or_else(|| {
                        derived
                            .get(challenge.index)
                            .map(|d| d.variant_seed.clone())
                    })
                    .unwrap_or_default();

                ChallengeDescriptor {
                    index: challenge.index,
                    kind: challenge.kind,
                    prompt: challenge.prompt,
                    variant_seed,
                }
            })
            .collect();

        ChallengeBatch::new(self.nonce, challenges, self.issued_at)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub healthy: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Request body for the peer signature-verification utility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerVerifyRequest {
    pub data: String,
    pub signature: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerVerifyReply {
    pub valid: bool,
}

/// Error body returned by the verifier on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::constants::BATCH_SIZE;
    use gauntlet_core::crosscheck_batch;
    use pretty_assertions::assert_eq;

    const NONCE: &str = "9f86d081884c7d659a2feaa0c55ad015";

    fn issue_without_seeds() -> ChallengeIssue {
        let derived = derive_batch(NONCE, BATCH_SIZE).unwrap();
        ChallengeIssue {
            nonce: NONCE.to_string(),
            challenges: derived
                .into_iter()
                .map(|d| IssuedChallenge {
                    index: d.index,
                    kind: d.kind,
                    prompt: d.prompt,
                    variant_seed: None,
                })
                .collect(),
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_field_names() {
        let issue = issue_without_seeds();
        let json = serde_json::to_value(&issue).unwrap();

        assert!(json["issuedAt"].is_string());
        assert_eq!(json["challenges"][0]["index"], 0);
        assert!(json["challenges"][0]["type"].is_string());
        assert!(json["challenges"][0]["promptText"].is_string());
        assert!(json["challenges"][0].get("variantSeed").is_none());
    }

    #[test]
    fn test_into_batch_recovers_missing_seeds() {
        let batch = issue_without_seeds().into_batch();

        assert_eq!(batch.challenges.len(), BATCH_SIZE);
        assert!(batch.challenges.iter().all(|c| !c.variant_seed.is_empty()));
        assert!(crosscheck_batch(&batch));
    }

    #[test]
    fn test_proof_submission_body_shape() {
        let proof = gauntlet_core::Proof {
            nonce: NONCE.to_string(),
            public_id: "deadbeef00112233aabb".to_string(),
            timestamp: 1_700_000_000_000,
            solutions: vec!["42".to_string()],
            signature: "c2ln".to_string(),
        };

        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["publicId"], "deadbeef00112233aabb");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert!(json["solutions"].is_array());
        assert!(json["signature"].is_string());
    }

    #[test]
    fn test_peer_verify_request_field_names() {
        let request = PeerVerifyRequest {
            data: "hello".to_string(),
            signature: "c2ln".to_string(),
            public_key: "a2V5".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["publicKey"], "a2V5");
    }
}
