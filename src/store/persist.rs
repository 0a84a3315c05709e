//! Key/document persistence for store state.
//!
//! One JSON document per key under the data directory, mirroring the web
//! client's key/value storage. Writes are synchronous; stores call `save`
//! on every mutation. Missing or corrupt documents load as defaults so a
//! damaged file never prevents startup.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// User registry and sessions.
pub const AUTH_STORAGE: &str = "auth-storage";
/// Wallet auto-reconnect flag and last chain id.
pub const WEB3_STORAGE: &str = "web3-storage";

#[derive(Clone)]
pub struct Documents {
    dir: PathBuf,
}

impl Documents {
    /// Open the document directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load a document, falling back to the default for missing or
    /// unreadable content.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.path_for(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read document, using default");
                return T::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Corrupt document, using default");
                T::default()
            }
        }
    }

    /// Serialize and write a document in place.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(self.path_for(key), json)
    }

    /// Remove a persisted document. Missing documents are not an error.
    pub fn clear(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
