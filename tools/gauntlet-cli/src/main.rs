//! Gauntlet CLI - agent attestation tool.
//!
//! # Commands
//!
//! - `gauntlet identity` - Show (creating if needed) this agent's identity
//! - `gauntlet sign <message>` - Sign a message with the agent identity
//! - `gauntlet verify-signature` - Verify a peer agent's signature locally
//! - `gauntlet derive <nonce>` - Derive the challenge batch for a nonce
//! - `gauntlet mock-challenge` - Mint a test nonce and its derived batch
//! - `gauntlet prove` - Solve a batch and print the signed proof
//! - `gauntlet health` - Check a verification server's health
//! - `gauntlet attest` - Run a full verification round-trip

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use gauntlet_agent::{Identity, Prover, Solver, SolverError};
use gauntlet_core::constants::BATCH_SIZE;
use gauntlet_core::{derive_batch, ChallengeBatch, ChallengeKind};
use gauntlet_crypto::{generate_nonce, NONCE_BYTES};
use gauntlet_http::{run_attestation, AttestationOutcome, VerifierClient};

#[derive(Parser)]
#[command(name = "gauntlet")]
#[command(about = "Agent attestation tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show this agent's identity, creating it on first use
    Identity {
        /// Identity store file
        #[arg(long, env = "GAUNTLET_IDENTITY", default_value = ".gauntlet/identity.json")]
        store: PathBuf,
    },

    /// Sign a message with the agent identity
    Sign {
        /// Message to sign (use - for stdin)
        message: String,

        #[arg(long, env = "GAUNTLET_IDENTITY", default_value = ".gauntlet/identity.json")]
        store: PathBuf,
    },

    /// Verify a peer agent's signature locally
    VerifySignature {
        /// The signed data
        data: String,

        /// Base64 signature
        signature: String,

        /// Peer's base64 public key
        public_key: String,
    },

    /// Derive the challenge batch a verifier would issue for a nonce
    Derive {
        /// Hex nonce
        nonce: String,

        /// Batch size
        #[arg(long, default_value_t = BATCH_SIZE)]
        count: usize,
    },

    /// Mint a fresh nonce and print its derived batch (for testing)
    MockChallenge {
        #[arg(long, default_value_t = BATCH_SIZE)]
        count: usize,
    },

    /// Solve a challenge batch and print the signed proof without
    /// submitting it
    Prove {
        /// Batch JSON file (use - for stdin); a one-challenge batch is
        /// proven in single mode
        batch: PathBuf,

        #[arg(long, env = "GAUNTLET_IDENTITY", default_value = ".gauntlet/identity.json")]
        store: PathBuf,

        /// Solver command: receives the prompt on stdin and must print
        /// the answer on stdout before the response deadline
        #[arg(long)]
        solver_cmd: String,
    },

    /// Check a verification server's health
    Health {
        #[arg(long, env = "GAUNTLET_SERVER", default_value = "http://localhost:8080")]
        server: String,
    },

    /// Fetch a challenge batch, solve it via an external command, and
    /// submit the signed proof
    Attest {
        #[arg(long, env = "GAUNTLET_SERVER", default_value = "http://localhost:8080")]
        server: String,

        #[arg(long, env = "GAUNTLET_IDENTITY", default_value = ".gauntlet/identity.json")]
        store: PathBuf,

        /// Solver command: receives the prompt on stdin and must print
        /// the answer on stdout before the response deadline
        #[arg(long)]
        solver_cmd: String,
    },
}

/// Solver that pipes each prompt through an external command.
struct CommandSolver {
    command: String,
}

#[async_trait]
impl Solver for CommandSolver {
    async fn solve(
        &self,
        prompt: &str,
        nonce: &str,
        kind: ChallengeKind,
    ) -> Result<String, SolverError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("GAUNTLET_NONCE", nonce)
            .env("GAUNTLET_KIND", kind.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| SolverError::Failed(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SolverError::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(SolverError::Failed(format!(
                "solver command exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gauntlet=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Identity { store } => show_identity(store).await,
        Commands::Sign { message, store } => sign_message(message, store).await,
        Commands::VerifySignature {
            data,
            signature,
            public_key,
        } => verify_signature(&data, &signature, &public_key),
        Commands::Derive { nonce, count } => derive(&nonce, count),
        Commands::MockChallenge { count } => mock_challenge(count),
        Commands::Prove {
            batch,
            store,
            solver_cmd,
        } => prove(batch, store, solver_cmd).await,
        Commands::Health { server } => health(&server).await,
        Commands::Attest {
            server,
            store,
            solver_cmd,
        } => attest(&server, store, solver_cmd).await,
    }
}

async fn show_identity(store: PathBuf) -> Result<()> {
    let identity = Identity::new(store);
    let outcome = identity.init().await?;
    tracing::debug!(?outcome, "identity ready");

    let public = identity.public().await?;
    println!("{}", serde_json::to_string_pretty(&public)?);
    Ok(())
}

async fn sign_message(message: String, store: PathBuf) -> Result<()> {
    let message = if message == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading message from stdin")?
    } else {
        message
    };

    let identity = Identity::new(store);
    let signature = identity.sign(&message).await?;
    let public = identity.public().await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "publicId": public.public_id,
            "publicKey": public.public_key,
            "signature": signature,
        }))?
    );
    Ok(())
}

fn verify_signature(data: &str, signature: &str, public_key: &str) -> Result<()> {
    let valid = Identity::verify(data, signature, public_key);
    println!("{}", serde_json::to_string(&serde_json::json!({ "valid": valid }))?);
    if !valid {
        std::process::exit(1);
    }
    Ok(())
}

fn derive(nonce: &str, count: usize) -> Result<()> {
    let challenges = derive_batch(nonce, count).context("deriving batch")?;
    println!("{}", serde_json::to_string_pretty(&challenges)?);
    Ok(())
}

fn mock_challenge(count: usize) -> Result<()> {
    let nonce = generate_nonce(NONCE_BYTES);
    let batch = ChallengeBatch::new(
        nonce.clone(),
        derive_batch(&nonce, count).context("deriving batch")?,
        Utc::now(),
    );
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}

async fn prove(batch: PathBuf, store: PathBuf, solver_cmd: String) -> Result<()> {
    let raw = if batch == PathBuf::from("-") {
        std::io::read_to_string(std::io::stdin()).context("reading batch from stdin")?
    } else {
        std::fs::read_to_string(&batch)
            .with_context(|| format!("reading batch from {}", batch.display()))?
    };
    let batch: ChallengeBatch = serde_json::from_str(&raw).context("parsing batch JSON")?;

    let identity = Identity::new(store);
    let prover = Prover::new(&identity);
    let solver = CommandSolver { command: solver_cmd };

    let proof = if batch.challenges.len() == 1 {
        prover.prove_single(&batch, &solver).await?
    } else {
        prover.prove_batch(&batch, &solver).await?
    };

    println!("{}", serde_json::to_string_pretty(&proof)?);
    Ok(())
}

async fn health(server: &str) -> Result<()> {
    let client = VerifierClient::new(server);
    let reply = client.health().await.context("health check failed")?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn attest(server: &str, store: PathBuf, solver_cmd: String) -> Result<()> {
    let client = VerifierClient::new(server);
    let identity = Identity::new(store);
    let solver = CommandSolver { command: solver_cmd };

    let outcome = run_attestation(&client, &identity, &solver).await?;
    match &outcome {
        AttestationOutcome::Verified(result) => {
            println!(
                "verified: {}/{} challenges passed",
                result.pass_count, result.required
            );
        }
        AttestationOutcome::Rejected(result) => {
            println!(
                "rejected: {}/{} challenges passed",
                result.pass_count, result.required
            );
        }
        AttestationOutcome::Expired => {
            println!("expired: solve budget ran out before submission");
        }
    }

    if !outcome.is_verified() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
