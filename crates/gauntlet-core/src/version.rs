//! Protocol version handling.
//!
//! Gauntlet uses a `major.minor` version string (e.g. "1.0"). Same major
//! version means compatible; minor bumps are additive. The version is
//! stamped into each persisted identity record and carried on the wire so
//! prover/verifier skew is detectable before derivation disagreements
//! show up as failed proofs.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Protocol family name, stamped into persisted identity records.
pub const PROTOCOL: &str = "gauntlet";

/// Current protocol version string.
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format '{0}': expected 'major.minor'")]
    InvalidFormat(String),

    #[error("Empty version string")]
    Empty,

    #[error("Version {got} is incompatible with {expected}: major versions must match")]
    Incompatible { got: String, expected: String },
}

/// Parsed `major.minor` protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// The version this build speaks.
    pub fn current() -> Self {
        Self::new(1, 0)
    }

    pub fn is_compatible_with(&self, other: &ProtocolVersion) -> bool {
        self.major == other.major
    }

    /// Check a peer's version string against this build.
    pub fn check_peer(version: &str) -> Result<ProtocolVersion, VersionError> {
        let parsed: ProtocolVersion = version.parse()?;
        if !parsed.is_compatible_with(&Self::current()) {
            return Err(VersionError::Incompatible {
                got: version.to_string(),
                expected: PROTOCOL_VERSION.to_string(),
            });
        }
        Ok(parsed)
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| VersionError::InvalidFormat(s.to_string()))?;

        let major = major
            .parse()
            .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;
        let minor = minor
            .parse()
            .map_err(|_| VersionError::InvalidFormat(s.to_string()))?;

        Ok(Self { major, minor })
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
