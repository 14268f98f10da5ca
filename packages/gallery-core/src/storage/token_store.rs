//! # Session Token Store
//!
//! A single named string slot holding the catalog bearer token.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SESSION TOKEN STORE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  TokenStore Trait                                                      │
//! │  • get()        - Current token, None when the slot is empty           │
//! │  • set(token)   - Overwrite the slot                                   │
//! │  • remove()     - Clear the slot (idempotent)                          │
//! │                                                                         │
//! │  ┌────────────────────┐      ┌────────────────────────────────────┐    │
//! │  │  MemoryTokenStore  │      │  FileTokenStore                    │    │
//! │  │  tests / ephemeral │      │  {data_dir}/{slot}, survives       │    │
//! │  │                    │      │  process restarts                  │    │
//! │  └────────────────────┘      └────────────────────────────────────┘    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Default slot name for the catalog token
pub const DEFAULT_TOKEN_SLOT: &str = "token";

/// Durable single-slot string store
pub trait TokenStore: Send + Sync {
    /// Read the slot. Empty values read back as `None`.
    fn get(&self) -> Result<Option<String>>;

    /// Write the slot
    fn set(&self, token: &str) -> Result<()>;

    /// Clear the slot. Clearing an empty slot is not an error.
    fn remove(&self) -> Result<()>;
}

/// In-memory token slot
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot.read().clone().filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot.write() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot.write() = None;
        Ok(())
    }
}

/// Token slot persisted as a file under a data directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Open the slot `slot` under `dir`. The directory is created on first write.
    pub fn open(dir: impl AsRef<Path>, slot: &str) -> Result<Self> {
        if slot.is_empty() || slot.contains(['/', '\\']) || slot == "." || slot == ".." {
            return Err(Error::InvalidConfig(format!("Invalid token slot name: {:?}", slot)));
        }
        Ok(Self {
            path: dir.as_ref().join(slot),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file a new token is written to before it replaces the slot
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::TokenStore(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash never leaves a half-written token
        let tmp = self.temp_path();
        fs::write(&tmp, token)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
