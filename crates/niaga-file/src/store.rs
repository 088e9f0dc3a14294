//! Filesystem storage for the local user store.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use niaga_core::error::{Error, InvalidInputError, StorageError};
use niaga_core::{Result, Role};

fn map_io(err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        message: err.to_string(),
    })
}

/// A user record in the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUser {
    /// Numeric id, assigned on creation.
    pub id: i64,
    /// Login name; also the record's filename.
    pub username: String,
    /// Authorization role.
    pub role: Role,
    /// Password hash (bcrypt).
    pub password_hash: String,
    /// When the user was created (RFC 3339).
    pub created_at: String,
}

/// Filesystem-backed storage, one JSON document per user.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn user_path(&self, username: &str) -> PathBuf {
        self.users_dir().join(format!("{}.json", username))
    }

    fn lock_path(&self) -> PathBuf {
        self.users_dir().join(".lock")
    }

    /// Usernames double as filenames, so constrain them to a safe set.
    fn validate_username(username: &str) -> Result<()> {
        let ok = !username.is_empty()
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if ok {
            Ok(())
        } else {
            Err(InvalidInputError::Username {
                value: username.to_string(),
                reason: "only ASCII letters, digits, '.', '_' and '-' are allowed".to_string(),
            }
            .into())
        }
    }

    /// Take the store's exclusive advisory lock for a write sequence.
    /// The lock is released when the returned file handle drops.
    fn lock_exclusive(&self) -> Result<fs::File> {
        fs::create_dir_all(self.users_dir()).map_err(map_io)?;
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;
        lock.lock_exclusive().map_err(map_io)?;
        Ok(lock)
    }

    /// Look up a user by username.
    pub fn find_user(&self, username: &str) -> Result<Option<LocalUser>> {
        Self::validate_username(username)?;
        let path = self.user_path(username);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(map_io)?;
        let user = serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: format!("user record {}: {}", path.display(), e),
            })
        })?;
        Ok(Some(user))
    }

    /// Create a user record, assigning the next numeric id.
    #[instrument(skip(self, password_hash))]
    pub fn create_user(&self, username: &str, password_hash: &str, role: Role) -> Result<LocalUser> {
        Self::validate_username(username)?;
        let _lock = self.lock_exclusive()?;

        if self.user_path(username).exists() {
            return Err(InvalidInputError::Username {
                value: username.to_string(),
                reason: "already exists".to_string(),
            }
            .into());
        }

        let user = LocalUser {
            id: self.next_id()?,
            username: username.to_string(),
            role,
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.write_user(&user)?;
        debug!(username, "user created");
        Ok(user)
    }

    /// Replace a user's password hash.
    #[instrument(skip(self, password_hash))]
    pub fn update_password_hash(&self, username: &str, password_hash: &str) -> Result<()> {
        let _lock = self.lock_exclusive()?;

        let mut user = self
            .find_user(username)?
            .ok_or_else(|| Error::Storage(StorageError::Corrupt {
                message: format!("user record for '{}' disappeared", username),
            }))?;

        user.password_hash = password_hash.to_string();
        self.write_user(&user)?;
        debug!(username, "password hash updated");
        Ok(())
    }

    fn write_user(&self, user: &LocalUser) -> Result<()> {
        let json = serde_json::to_string_pretty(user).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                message: e.to_string(),
            })
        })?;
        fs::write(self.user_path(&user.username), json).map_err(map_io)
    }

    fn next_id(&self) -> Result<i64> {
        let mut max = 0;
        for entry in fs::read_dir(self.users_dir()).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let json = fs::read_to_string(&path).map_err(map_io)?;
            if let Ok(user) = serde_json::from_str::<LocalUser>(&json) {
                max = max.max(user.id);
            }
        }
        Ok(max + 1)
    }
}
