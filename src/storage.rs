//! Persistent key/value storage for the session.
//!
//! In the browser this is `localStorage`; the session keeps two entries in
//! it, the bearer token and the serialized profile (see
//! [`SessionConfig`](crate::SessionConfig) for the key names). Hosts plug in
//! their own backend by implementing [`CredentialStore`]; [`MemoryStore`]
//! covers tests and non-browser hosts.

use std::cell::RefCell;
use std::collections::HashMap;

/// Trait for session storage backends.
///
/// Methods take `&self` because the store is shared between the session
/// and whatever else the host keeps in it. Backends use interior
/// mutability.
pub trait CredentialStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str);

    /// Delete `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);

    /// Check if a value exists under `key`.
    ///
    /// Default implementation calls `get()` and checks for Some.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory store. Does not persist across restarts.
///
/// ```
/// use vidshare_navigator::{CredentialStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("auth_token", "abc");
/// assert_eq!(store.get("auth_token").as_deref(), Some("abc"));
/// store.remove("auth_token");
/// assert!(!store.contains("auth_token"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("auth_token"), None);

        store.set("auth_token", "t1");
        store.set("auth_token", "t2");
        assert_eq!(store.get("auth_token").as_deref(), Some("t2"));
        assert_eq!(store.len(), 1);

        store.remove("auth_token");
        store.remove("auth_token");
        assert!(!store.contains("auth_token"));
    }
}
