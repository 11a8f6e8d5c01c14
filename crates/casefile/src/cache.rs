//! Local cache for the sync client.
//!
//! Two files live in the cache directory: the last evidence snapshot seen
//! (the best-effort mirror used when the remote store is unreachable) and
//! the current session (cleared on logout). Neither is authoritative.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::auth::SessionUser;
use crate::error::{Error, Result};
use crate::record::EvidenceSet;

/// File name of the evidence snapshot mirror.
const SNAPSHOT_FILE: &str = "evidence.json";

/// File name of the saved session.
const SESSION_FILE: &str = "session.json";

/// The local cache directory holding the snapshot and session files.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Open the cache, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { dir })
    }

    /// Path of the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the last evidence snapshot, if one was ever mirrored.
    ///
    /// An unreadable or corrupt snapshot is treated as absent; the cache is
    /// best-effort by contract.
    #[must_use]
    pub fn load_snapshot(&self) -> Option<EvidenceSet> {
        self.read_json(SNAPSHOT_FILE)
    }

    /// Mirror an evidence snapshot to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_snapshot(&self, set: &EvidenceSet) -> Result<()> {
        self.write_json(SNAPSHOT_FILE, set)
    }

    /// Load the saved session, if any.
    #[must_use]
    pub fn load_session(&self) -> Option<SessionUser> {
        self.read_json(SESSION_FILE)
    }

    /// Persist the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_session(&self, user: &SessionUser) -> Result<()> {
        self.write_json(SESSION_FILE, user)
    }

    /// Remove the saved session. Missing files are fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.dir.join(SESSION_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("could not read cache file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_vec(value)?;
        std::fs::write(&path, json)?;
        debug!("wrote cache file {}", path.display());
        Ok(())
    }
}
