//! Persistent client-side key-value storage
//!
//! A small directory-backed string store, the desktop analog of browser
//! origin-scoped storage. Every key is one file holding the raw value;
//! absent keys read back as `None`.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the sidebar-collapsed UI preference.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar_collapsed";

/// Directory-backed string storage.
#[derive(Debug, Clone)]
pub struct StorageArea {
    dir: PathBuf,
}

impl StorageArea {
    /// Open (creating if necessary) a storage area rooted at `dir`.
    pub fn open(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the default per-user storage area.
    pub fn open_default() -> io::Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no user data directory"))?;
        Self::open(base.join("skriber"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a value. Missing keys and unreadable files both read as `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key, %err, "failed to read storage key");
                None
            }
        }
    }

    /// Write a value, replacing any previous one.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(err) = fs::write(self.key_path(key), value) {
            warn!(key, %err, "failed to write storage key");
        }
    }

    /// Delete a value. Deleting an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(key, %err, "failed to remove storage key"),
        }
    }

    /// Whether a value is present for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> (tempfile::TempDir, StorageArea) {
        let dir = tempfile::tempdir().unwrap();
        let area = StorageArea::open(dir.path().join("store")).unwrap();
        (dir, area)
    }

    #[test]
    fn test_get_absent_key() {
        let (_dir, area) = area();
        assert_eq!(area.get("missing"), None);
        assert!(!area.contains("missing"));
    }

    #[test]
    fn test_set_and_get() {
        let (_dir, area) = area();
        area.set("k", "value");
        assert_eq!(area.get("k"), Some("value".to_string()));
        assert!(area.contains("k"));
    }

    #[test]
    fn test_set_overwrites() {
        let (_dir, area) = area();
        area.set("k", "one");
        area.set("k", "two");
        assert_eq!(area.get("k"), Some("two".to_string()));
    }

    #[test]
    fn test_remove_is_absent_safe() {
        let (_dir, area) = area();
        area.remove("k");
        area.set("k", "v");
        area.remove("k");
        assert_eq!(area.get("k"), None);
    }
}
