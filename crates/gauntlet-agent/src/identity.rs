//! Persistent agent identity.
//!
//! One key pair per agent installation, generated on first use and loaded
//! from a single JSON store file on every use after that. The store holds
//! the private key and is written with owner-only permissions; it is the
//! sole source of truth for the identity and must never be transmitted.
//!
//! A store that exists but fails to parse is overwritten with a fresh
//! identity rather than halting the agent. That trade-off loses the old
//! identity, so the regeneration is logged at warn level and surfaced
//! through [`LoadOutcome`] for hosts that want to alert on identity
//! churn. Callers needing durability must back the store up out-of-band.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

use gauntlet_core::{ProtocolVersion, PROTOCOL, PROTOCOL_VERSION};
use gauntlet_crypto::KeyPair;

use crate::error::AgentError;

/// Persisted store layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRecord {
    public_key: String,
    private_key: String,
    public_id: String,
    created_at: DateTime<Utc>,
    protocol: String,
    version: String,
}

/// How `init()` obtained the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No store existed; a fresh identity was generated and persisted.
    Created,
    /// The store parsed cleanly.
    Loaded,
    /// The store was corrupt and has been overwritten with a fresh
    /// identity. The previous identity is gone.
    Regenerated,
}

/// The public half of an identity. Never contains the private key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub public_key: String,
    pub public_id: String,
    pub created_at: DateTime<Utc>,
    pub protocol_version: String,
}

struct LoadedIdentity {
    keypair: KeyPair,
    public_id: String,
    created_at: DateTime<Utc>,
    version: String,
    outcome: LoadOutcome,
}

/// A lazily-initialized persistent identity bound to one store path.
///
/// Owned by whatever context constructs it and injected where needed;
/// there is no ambient global instance. Concurrent `init()` calls on the
/// same instance are serialized, first caller wins.
pub struct Identity {
    store_path: PathBuf,
    state: OnceCell<LoadedIdentity>,
}

impl Identity {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            state: OnceCell::new(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Load or create the identity.
    ///
    /// Idempotent: every call after the first returns the outcome of the
    /// initial load without touching the store again.
    pub async fn init(&self) -> Result<LoadOutcome, AgentError> {
        let loaded = self.loaded().await?;
        Ok(loaded.outcome)
    }

    /// The shareable half of the identity, initializing lazily.
    pub async fn public(&self) -> Result<PublicIdentity, AgentError> {
        let loaded = self.loaded().await?;
        Ok(PublicIdentity {
            public_key: loaded.keypair.public_key().to_base64(),
            public_id: loaded.public_id.clone(),
            created_at: loaded.created_at,
            protocol_version: loaded.version.clone(),
        })
    }

    /// Fingerprint of this identity's public key.
    pub async fn public_id(&self) -> Result<String, AgentError> {
        let loaded = self.loaded().await?;
        Ok(loaded.public_id.clone())
    }

    /// Sign data with the stored private key, initializing lazily.
    pub async fn sign(&self, data: &str) -> Result<String, AgentError> {
        let loaded = self.loaded().await?;
        Ok(loaded.keypair.sign(data))
    }

    /// Verify another agent's signature. Needs no identity instance.
    pub fn verify(data: &str, signature_b64: &str, public_key_b64: &str) -> bool {
        gauntlet_crypto::verify(data, signature_b64, public_key_b64)
    }

    async fn loaded(&self) -> Result<&LoadedIdentity, AgentError> {
        self.state
            .get_or_try_init(|| async { load_or_create(&self.store_path) })
            .await
    }
}

fn load_or_create(path: &Path) -> Result<LoadedIdentity, AgentError> {
    match fs::read_to_string(path) {
        Ok(raw) => match parse_record(&raw) {
            Ok(loaded) => {
                tracing::debug!(store = %path.display(), public_id = %loaded.public_id, "identity loaded");
                Ok(loaded)
            }
            Err(reason) => {
                tracing::warn!(
                    store = %path.display(),
                    %reason,
                    "identity store is corrupt; regenerating and overwriting"
                );
                create(path, LoadOutcome::Regenerated)
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => create(path, LoadOutcome::Created),
        Err(source) => Err(AgentError::Store {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_record(raw: &str) -> Result<LoadedIdentity, String> {
    let record: IdentityRecord =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;

    let keypair =
        KeyPair::from_base64(&record.private_key).map_err(|e| format!("unusable key: {e}"))?;

    // A record whose fingerprint disagrees with its key has been edited
    // or truncated; treat it like any other corruption
    let fingerprint = keypair.fingerprint();
    if fingerprint != record.public_id {
        return Err(format!(
            "fingerprint mismatch: record says {}, key derives {}",
            record.public_id, fingerprint
        ));
    }

    ProtocolVersion::check_peer(&record.version).map_err(|e| e.to_string())?;

    Ok(LoadedIdentity {
        keypair,
        public_id: record.public_id,
        created_at: record.created_at,
        version: record.version,
        outcome: LoadOutcome::Loaded,
    })
}

fn create(path: &Path, outcome: LoadOutcome) -> Result<LoadedIdentity, AgentError> {
    let store_err = |source| AgentError::Store {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(store_err)?;
        }
    }

    let keypair = KeyPair::generate();
    let record = IdentityRecord {
        public_key: keypair.public_key().to_base64(),
        private_key: keypair.secret_key_base64(),
        public_id: keypair.fingerprint(),
        created_at: Utc::now(),
        protocol: PROTOCOL.to_string(),
        version: PROTOCOL_VERSION.to_string(),
    };

    write_record(path, &record).map_err(store_err)?;
    tracing::info!(store = %path.display(), public_id = %record.public_id, "identity created");

    Ok(LoadedIdentity {
        keypair,
        public_id: record.public_id,
        created_at: record.created_at,
        version: record.version,
        outcome,
    })
}

/// Write the store atomically: temp file in the same directory, then
/// rename over the target. A crash mid-write leaves the old store (or
/// nothing) in place, never a half-written record.
fn write_record(path: &Path, record: &IdentityRecord) -> io::Result<()> {
    let json = serde_json::to_string_pretty(record)
        .expect("identity record serializes to plain JSON");

    let tmp_path = path.with_extension("tmp");
    let mut file = open_private(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_crypto::PUBLIC_ID_LENGTH;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> PathBuf {
        dir.path().join("agent").join("identity.json")
    }

    #[tokio::test]
    async fn test_first_init_creates_store() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);
        let identity = Identity::new(&path);

        assert_eq!(identity.init().await.unwrap(), LoadOutcome::Created);
        assert!(path.exists());

        let public = identity.public().await.unwrap();
        assert_eq!(public.public_id.len(), PUBLIC_ID_LENGTH);
        assert!(public.public_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(public.protocol_version, PROTOCOL_VERSION);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);
        Identity::new(&path).init().await.unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_reload_returns_same_identity() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);

        let first = Identity::new(&path);
        first.init().await.unwrap();
        let original_id = first.public_id().await.unwrap();

        let second = Identity::new(&path);
        assert_eq!(second.init().await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(second.public_id().await.unwrap(), original_id);
    }

    #[tokio::test]
    async fn test_corrupt_store_regenerates() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);

        let first = Identity::new(&path);
        first.init().await.unwrap();
        let original_id = first.public_id().await.unwrap();

        fs::write(&path, "{ not valid json").unwrap();

        let second = Identity::new(&path);
        assert_eq!(second.init().await.unwrap(), LoadOutcome::Regenerated);

        let new_id = second.public_id().await.unwrap();
        assert_ne!(new_id, original_id);
        assert_eq!(new_id.len(), PUBLIC_ID_LENGTH);

        // The overwritten store loads cleanly next time
        let third = Identity::new(&path);
        assert_eq!(third.init().await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(third.public_id().await.unwrap(), new_id);
    }

    #[tokio::test]
    async fn test_tampered_fingerprint_counts_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);

        Identity::new(&path).init().await.unwrap();

        let mut record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        record["publicId"] = serde_json::json!("00000000000000000000");
        fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();

        let reopened = Identity::new(&path);
        assert_eq!(reopened.init().await.unwrap(), LoadOutcome::Regenerated);
    }

    #[tokio::test]
    async fn test_concurrent_init_yields_one_identity() {
        let dir = TempDir::new().unwrap();
        let path = store_in(&dir);
        let identity = Arc::new(Identity::new(&path));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let identity = Arc::clone(&identity);
            handles.push(tokio::spawn(async move {
                identity.init().await.unwrap();
                identity.public_id().await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);

        // And the store agrees with the in-process identity
        let record: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(record["publicId"], serde_json::json!(ids[0]));
    }

    #[tokio::test]
    async fn test_sign_and_static_verify() {
        let dir = TempDir::new().unwrap();
        let identity = Identity::new(store_in(&dir));

        // sign() initializes lazily; no explicit init needed
        let signature = identity.sign("ping from agent").await.unwrap();
        let public = identity.public().await.unwrap();

        assert!(Identity::verify(
            "ping from agent",
            &signature,
            &public.public_key
        ));
        assert!(!Identity::verify(
            "ping from imposter",
            &signature,
            &public.public_key
        ));
    }

    #[tokio::test]
    async fn test_public_never_leaks_private_key() {
        let dir = TempDir::new().unwrap();
        let identity = Identity::new(store_in(&dir));
        let public = identity.public().await.unwrap();

        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("privateKey"));
    }
}
