//! Bearer token persistence
//!
//! Holds the one session credential. Presence of a token is the local
//! "possibly authenticated" signal; expiry is only ever discovered by a
//! failed authenticated call, so nothing here tracks time.

use crate::api::storage::{StorageArea, ACCESS_TOKEN_KEY};

/// Persistent store for the bearer credential.
///
/// At most one token is stored at a time; `set` replaces any previous one.
#[derive(Debug, Clone)]
pub struct TokenStore {
    area: StorageArea,
}

impl TokenStore {
    pub fn new(area: StorageArea) -> Self {
        Self { area }
    }

    /// The stored token, if any.
    pub fn get(&self) -> Option<String> {
        self.area.get(ACCESS_TOKEN_KEY)
    }

    /// Store a token, replacing any previous one.
    pub fn set(&self, token: &str) {
        self.area.set(ACCESS_TOKEN_KEY, token);
    }

    /// Remove the stored token. Safe to call when none is stored.
    pub fn clear(&self) {
        self.area.remove(ACCESS_TOKEN_KEY);
    }

    /// Whether a token is currently stored.
    pub fn has_token(&self) -> bool {
        self.area.contains(ACCESS_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let area = StorageArea::open(dir.path().to_path_buf()).unwrap();
        (dir, TokenStore::new(area))
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert_eq!(store.get(), None);
        assert!(!store.has_token());
    }

    #[test]
    fn test_set_get_clear() {
        let (_dir, store) = store();
        store.set("tok-123");
        assert!(store.has_token());
        assert_eq!(store.get(), Some("tok-123".to_string()));

        store.clear();
        assert!(!store.has_token());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_set_replaces_previous_token() {
        let (_dir, store) = store();
        store.set("first");
        store.set("second");
        assert_eq!(store.get(), Some("second".to_string()));
    }
}
