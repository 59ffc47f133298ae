//! Reqwest-based client for the Gauntlet verification service.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use gauntlet_core::{ChallengeBatch, Proof, VerificationResult};

use crate::error::TransportError;
use crate::wire::{ChallengeIssue, ErrorBody, HealthReply, PeerVerifyReply, PeerVerifyRequest};

/// Client for a Gauntlet verification service.
///
/// # Example
///
/// ```ignore
/// use gauntlet_http::VerifierClient;
///
/// let client = VerifierClient::new("https://verifier.example.com");
/// let batch = client.fetch_challenge().await?;
/// ```
pub struct VerifierClient {
    client: Client,
    base_url: String,
}

impl VerifierClient {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("default reqwest client builds"),
            base_url: base_url.into(),
        }
    }

    /// Create a client with custom reqwest settings.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /v1/health`
    pub async fn health(&self) -> Result<HealthReply, TransportError> {
        let response = self
            .client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /v1/challenge` — request a fresh challenge batch.
    pub async fn fetch_challenge(&self) -> Result<ChallengeBatch, TransportError> {
        let response = self
            .client
            .post(format!("{}/v1/challenge", self.base_url))
            .send()
            .await?;
        let issue: ChallengeIssue = decode(response).await?;

        tracing::debug!(nonce = %issue.nonce, challenges = issue.challenges.len(), "challenge batch issued");
        Ok(issue.into_batch())
    }

    /// `POST /v1/proof` — submit a signed proof for judgment.
    pub async fn submit_proof(&self, proof: &Proof) -> Result<VerificationResult, TransportError> {
        let response = self
            .client
            .post(format!("{}/v1/proof", self.base_url))
            .json(proof)
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /v1/verify-signature` — check another agent's self-signed
    /// message against its published key.
    pub async fn verify_peer_signature(
        &self,
        data: &str,
        signature: &str,
        public_key: &str,
    ) -> Result<bool, TransportError> {
        let request = PeerVerifyRequest {
            data: data.to_string(),
            signature: signature.to_string(),
            public_key: public_key.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/verify-signature", self.base_url))
            .json(&request)
            .send()
            .await?;
        let reply: PeerVerifyReply = decode(response).await?;
        Ok(reply.valid)
    }
}

/// Decode a success body, or surface the verifier's error body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(TransportError::Server {
        status: status.as_u16(),
        message,
    })
}

impl Default for VerifierClient {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
