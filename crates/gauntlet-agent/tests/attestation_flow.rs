//! End-to-end attestation flow without a network: derive a batch the way
//! an issuer would, prove it with a scripted solver, then judge the proof
//! with the verifier contract under a controlled clock.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tempfile::TempDir;

use gauntlet_agent::{Identity, Prover, Solver, SolverError};
use gauntlet_core::constants::{BATCH_SIZE, MIN_PASS_COUNT};
use gauntlet_core::{
    check_submission, derive_batch, tally, ChallengeBatch, ChallengeKind, NonceLedger,
};
use gauntlet_crypto::{generate_nonce, NONCE_BYTES};

struct ScriptedSolver;

#[async_trait]
impl Solver for ScriptedSolver {
    async fn solve(
        &self,
        _prompt: &str,
        nonce: &str,
        kind: ChallengeKind,
    ) -> Result<String, SolverError> {
        Ok(format!("{kind}:{}", &nonce[..4]))
    }
}

#[tokio::test]
async fn prove_then_judge_accepts_and_burns_the_nonce() {
    let dir = TempDir::new().unwrap();
    let identity = Identity::new(dir.path().join("identity.json"));
    let prover = Prover::new(&identity);

    // Issuer side
    let nonce = generate_nonce(NONCE_BYTES);
    let issued_at = Utc::now();
    let batch = ChallengeBatch::new(
        nonce.clone(),
        derive_batch(&nonce, BATCH_SIZE).unwrap(),
        issued_at,
    );

    // Prover side
    let proof = prover.prove_batch(&batch, &ScriptedSolver).await.unwrap();

    // Verifier side, clock pinned to the proof's own submission instant
    let arrival = chrono::DateTime::from_timestamp_millis(proof.timestamp).unwrap();
    let public = identity.public().await.unwrap();

    let mut ledger = NonceLedger::new();
    assert!(ledger.claim(&nonce));
    check_submission(&batch, &proof, &public.public_key, arrival).unwrap();

    let verdict = tally(&vec![true; BATCH_SIZE], MIN_PASS_COUNT);
    assert!(verdict.verified);

    // Replays die at the ledger
    assert!(!ledger.claim(&nonce));
}

#[tokio::test]
async fn a_proof_for_one_nonce_cannot_back_another_batch() {
    let dir = TempDir::new().unwrap();
    let identity = Identity::new(dir.path().join("identity.json"));
    let prover = Prover::new(&identity);

    let nonce = generate_nonce(NONCE_BYTES);
    let batch = ChallengeBatch::new(
        nonce.clone(),
        derive_batch(&nonce, BATCH_SIZE).unwrap(),
        Utc::now(),
    );
    let proof = prover.prove_batch(&batch, &ScriptedSolver).await.unwrap();

    // Same proof presented against a different issued batch
    let other_nonce = generate_nonce(NONCE_BYTES);
    let other_batch = ChallengeBatch::new(
        other_nonce.clone(),
        derive_batch(&other_nonce, BATCH_SIZE).unwrap(),
        Utc::now(),
    );

    let public = identity.public().await.unwrap();
    let arrival = chrono::DateTime::from_timestamp_millis(proof.timestamp).unwrap();
    assert!(check_submission(&other_batch, &proof, &public.public_key, arrival).is_err());
}

#[tokio::test]
async fn late_arrival_is_rejected_even_with_a_timely_timestamp() {
    let dir = TempDir::new().unwrap();
    let identity = Identity::new(dir.path().join("identity.json"));
    let prover = Prover::new(&identity);

    let nonce = generate_nonce(NONCE_BYTES);
    let batch = ChallengeBatch::new(
        nonce.clone(),
        derive_batch(&nonce, BATCH_SIZE).unwrap(),
        Utc::now(),
    );
    let proof = prover.prove_batch(&batch, &ScriptedSolver).await.unwrap();

    let public = identity.public().await.unwrap();
    let late_arrival = batch.issued_at + Duration::seconds(10);
    assert!(check_submission(&batch, &proof, &public.public_key, late_arrival).is_err());
}
