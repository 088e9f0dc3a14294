//! Durable identity cache in the platform data directory.
//!
//! One record, `user.json`, holding the JSON-encoded identity. Written on
//! successful login, removed on logout, read once at boot as a
//! non-authoritative hint.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result as AnyResult};
use directories::ProjectDirs;

use niaga_core::error::{Error, StorageError};
use niaga_core::{Identity, IdentityCache, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        message: err.to_string(),
    })
}

/// File-backed [`IdentityCache`].
#[derive(Debug)]
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    /// Cache at the platform data directory.
    pub fn at_data_dir() -> AnyResult<Self> {
        let dirs =
            ProjectDirs::from("", "", "niaga").context("Could not determine data directory")?;

        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        Ok(Self {
            path: data_dir.join("user.json"),
        })
    }

    /// Cache at an explicit path.
    #[allow(dead_code)]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentityCache for FileIdentityCache {
    fn load(&self) -> Result<Option<Identity>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(map_io)?;
        let identity = serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: format!("cached identity {}: {}", self.path.display(), e),
            })
        })?;
        Ok(Some(identity))
    }

    fn store(&self, identity: &Identity) -> Result<()> {
        let json = serde_json::to_string_pretty(identity).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: e.to_string(),
            })
        })?;

        fs::write(&self.path, &json).map_err(map_io)?;

        // Restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path).map_err(map_io)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(map_io)?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(map_io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niaga_core::Role;

    #[test]
    fn cache_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileIdentityCache::at_path(dir.path().join("user.json"));

        assert_eq!(cache.load().unwrap(), None);

        let identity = Identity::new(3, "budi", Role::Admin);
        cache.store(&identity).unwrap();
        assert_eq!(cache.load().unwrap(), Some(identity));

        cache.clear().unwrap();
        assert_eq!(cache.load().unwrap(), None);
        // Clearing an empty cache is fine.
        cache.clear().unwrap();
    }

    #[test]
    fn corrupt_record_is_reported_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        fs::write(&path, "not json").unwrap();

        let cache = FileIdentityCache::at_path(&path);
        assert!(matches!(cache.load(), Err(Error::Storage(_))));
    }
}
