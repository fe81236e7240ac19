//! Session snapshot persistence for ecotrack.
//!
//! The session user is persisted as a single JSON document: written on
//! login, registration, profile edits, and emission adds; read once at
//! startup; removed on logout. The document carries a schema version so
//! a newer format is detected instead of silently misread.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::user::UserProfile;

/// The current snapshot schema version.
pub const CURRENT_VERSION: u32 = 1;

/// On-disk shape of the session snapshot.
///
/// The profile fields are flattened beside the version, so the document
/// reads as one user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Snapshot {
    /// Format version; 0 marks a snapshot written before versioning.
    #[serde(default)]
    schema_version: u32,

    /// The persisted session user.
    #[serde(flatten)]
    user: UserProfile,
}

/// Explicit save/load boundary for the persisted session.
///
/// All snapshot I/O goes through this type; nothing else in the crate
/// touches the file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Path to the snapshot file.
    path: PathBuf,
}

impl SessionStore {
    /// Create a store for the snapshot at the given path.
    ///
    /// The file is not touched until [`load`](Self::load) or
    /// [`save`](Self::save) is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a snapshot file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted session user, if any.
    ///
    /// A missing file is not an error; it simply means no session was
    /// persisted. Version 0 snapshots (written before versioning) load
    /// normally and are upgraded on the next save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid
    /// JSON, or was written by a newer version of this program.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        if !self.path.exists() {
            debug!("No session snapshot at {}", self.path.display());
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|source| Error::SnapshotRead {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        if snapshot.schema_version > CURRENT_VERSION {
            return Err(Error::SnapshotVersion {
                found: snapshot.schema_version,
                supported: CURRENT_VERSION,
            });
        }

        debug!(
            "Loaded session snapshot for user {} (version {})",
            snapshot.user.id, snapshot.schema_version
        );
        Ok(Some(snapshot.user))
    }

    /// Persist the session user, replacing any existing snapshot.
    ///
    /// Creates the parent directories if needed. Always writes the
    /// current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created or the file
    /// cannot be written.
    pub fn save(&self, user: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let snapshot = Snapshot {
            schema_version: CURRENT_VERSION,
            user: user.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, json)?;

        debug!(
            "Saved session snapshot for user {} at {}",
            user.id,
            self.path.display()
        );
        Ok(())
    }

    /// Remove the snapshot, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Cleared session snapshot at {}", self.path.display());
        }
        Ok(())
    }
}
