//! Core ProfileStore implementation

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extension of every stored record
pub const RECORD_EXTENSION: &str = "json";

/// Name of the lock file guarding writes
const LOCK_FILE: &str = ".lock";

/// The main profile store
pub struct ProfileStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl ProfileStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened profile store");
        Ok(Self { base_path })
    }

    /// Root directory of this store
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Read a record, `None` if it was never written
    pub fn get(&self, user: &str, key: &str) -> Result<Option<String>> {
        let path = self.record_path(user, key)?;
        if !path.exists() {
            debug!(user, key, "Record not found");
            return Ok(None);
        }
        let content = fs::read_to_string(&path).context(format!("Failed to read record: {}", path.display()))?;
        Ok(Some(content))
    }

    /// Write a record, replacing any previous value
    ///
    /// The value lands in a temp file first and is renamed into place, so a
    /// reader never observes a half-written record.
    pub fn put(&self, user: &str, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(user, key)?;
        let lock = self.lock()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("{}.tmp", RECORD_EXTENSION));
        fs::write(&tmp, value).context(format!("Failed to write record: {}", tmp.display()))?;
        fs::rename(&tmp, &path).context(format!("Failed to commit record: {}", path.display()))?;

        FileExt::unlock(&lock)?;
        info!(user, key, bytes = value.len(), "Stored record");
        Ok(())
    }

    /// Delete a record, returning whether it existed
    pub fn delete(&self, user: &str, key: &str) -> Result<bool> {
        let path = self.record_path(user, key)?;
        let lock = self.lock()?;
        let existed = path.exists();
        if existed {
            fs::remove_file(&path)?;
            info!(user, key, "Deleted record");
        }
        FileExt::unlock(&lock)?;
        Ok(existed)
    }

    /// List record keys stored for a user
    pub fn keys(&self, user: &str) -> Result<Vec<String>> {
        let dir = self.user_dir(user)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == RECORD_EXTENSION).unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// List all users with at least a directory in the store
    pub fn users(&self) -> Result<Vec<String>> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                users.push(name.to_string());
            }
        }
        users.sort();
        Ok(users)
    }

    fn user_dir(&self, user: &str) -> Result<PathBuf> {
        check_segment("user", user)?;
        Ok(self.base_path.join(user))
    }

    fn record_path(&self, user: &str, key: &str) -> Result<PathBuf> {
        check_segment("key", key)?;
        Ok(self.user_dir(user)?.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn lock(&self) -> Result<fs::File> {
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.base_path.join(LOCK_FILE))
            .context("Failed to open store lock")?;
        FileExt::lock_exclusive(&file).context("Failed to lock store")?;
        Ok(file)
    }
}

/// Users and keys become path segments, so they must not escape the store
fn check_segment(what: &str, segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment.starts_with('.')
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains('\0')
    {
        return Err(eyre!("Invalid {} name: {:?}", what, segment));
    }
    Ok(())
}
