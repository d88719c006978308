//! Bearer credential and its durable storage.
//!
//! Exactly one credential is persisted at a time. Absence means logged out.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

/// Keychain service name
const SERVICE_NAME: &str = "freelancehub";

/// The single durable key holding the bearer credential
pub const TOKEN_KEY: &str = "token";

/// Token file name in the data directory
const TOKEN_FILE: &str = "token.json";

/// An opaque bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(***)")
    }
}

/// Durable client-side storage for the credential.
pub trait TokenStore: Send + Sync {
    /// Read the persisted credential, `None` when logged out
    fn load(&self) -> Result<Option<Credential>>;

    fn save(&self, credential: &Credential) -> Result<()>;

    /// Remove the persisted credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

// ============================================================================
// File-backed store
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: DateTime<Utc>,
}

/// Stores the credential as JSON in the application's data directory.
pub struct FileTokenStore {
    data_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let stored: StoredToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credential::new(stored.token)))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let stored = StoredToken {
            token: credential.expose().to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

// ============================================================================
// OS keychain store
// ============================================================================

/// Stores the credential in the OS keychain.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<Credential>> {
        match Self::entry()?.get_password() {
            Ok(token) if !token.is_empty() => Ok(Some(Credential::new(token))),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        Self::entry()?
            .set_password(credential.expose())
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store. Clones share the same slot, which lets a caller keep a
/// handle and inspect what the session persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    /// The raw persisted token, if any
    pub fn stored(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, value: Option<String>) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))?;
        *slot = value;
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.stored().map(Credential::new))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.set(Some(credential.expose().to_string()))
    }

    fn clear(&self) -> Result<()> {
        self.set(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("super-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret"));
        assert_eq!(credential.expose(), "super-secret");
    }

    #[test]
    fn test_file_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert_eq!(store.load().expect("load empty"), None);

        store.save(&Credential::new("tok1")).expect("save");
        assert_eq!(store.load().expect("load"), Some(Credential::new("tok1")));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load after clear"), None);
        // Clearing twice is fine
        store.clear().expect("clear again");
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(TOKEN_FILE), "not json").expect("write");
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let handle = store.clone();
        store.save(&Credential::new("abc")).expect("save");
        assert_eq!(handle.stored().as_deref(), Some("abc"));
        handle.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
