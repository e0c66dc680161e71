//! API credential storage.
//!
//! Persists exactly one value: the bearer token for the completion
//! service, kept as a single namespaced file under the tool's home
//! directory. Values are validated when stored, and the token never
//! appears in debug output.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix the issuing service puts on every key.
const KEY_PREFIX: &str = "sk-";

/// File name under the pdfchat directory.
const CREDENTIAL_FILE: &str = "credential";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API keys must start with \"{KEY_PREFIX}\"")]
    InvalidFormat,
    #[error("credential storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// An opaque bearer token. Only [`expose`](Self::expose) reveals it, for
/// the Authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate a raw key. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let raw = raw.trim();
        if !raw.starts_with(KEY_PREFIX) {
            return Err(CredentialError::InvalidFormat);
        }
        Ok(Self(raw.to_string()))
    }

    /// The raw token, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({KEY_PREFIX}***)")
    }
}

/// File-backed store for the one credential.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the default location (`~/.pdfchat/credential`).
    pub fn open_default() -> Result<Self, CredentialError> {
        let dir = crate::config::pdfchat_dir()
            .map_err(|e| CredentialError::StorageUnavailable(e.to_string()))?;
        Ok(Self {
            path: dir.join(CREDENTIAL_FILE),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted credential, if any. No side effects.
    pub fn get(&self) -> Result<Option<Credential>, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage(e)),
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        // Stored values were validated by set(); the read path treats the
        // file content as opaque.
        Ok(Some(Credential(raw.to_string())))
    }

    /// Validate and persist a raw key. Nothing is written on a
    /// validation failure.
    pub fn set(&self, raw: &str) -> Result<Credential, CredentialError> {
        let credential = Credential::parse(raw)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage)?;
        }
        fs::write(&self.path, credential.expose()).map_err(storage)?;

        Ok(credential)
    }

    /// Remove the persisted credential. Removing an absent credential is
    /// a no-op.
    pub fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage(e)),
        }
    }
}

fn storage(e: io::Error) -> CredentialError {
    CredentialError::StorageUnavailable(e.to_string())
}
