//! Registry of every player key known to exist.
//!
//! Membership is independent of whether a record is currently cached.

use std::collections::BTreeSet;

use scc::HashSet;
use tracing::debug;

use crate::key::Key;

/// Thread-safe set of known player keys.
/// Uses scc::HashSet for lock-free concurrent access.
#[derive(Default)]
pub struct KeyRegistry {
    keys: HashSet<Key>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a player with this name is known. Invalid names are never known.
    pub async fn exists(&self, name: &str) -> bool {
        match Key::new(name) {
            Ok(key) => self.contains(&key).await,
            Err(_) => false,
        }
    }

    pub async fn contains(&self, key: &Key) -> bool {
        self.keys.contains_async(key).await
    }

    /// Add a key. Adding a key that is already present is a no-op.
    pub async fn add(&self, key: Key) {
        let logged = key.clone();
        if self.keys.insert_async(key).await.is_ok() {
            debug!(key = %logged, "registered user key");
        }
    }

    /// Remove a key. Returns whether it was present.
    pub async fn remove(&self, key: &Key) -> bool {
        self.keys.remove_async(key).await.is_some()
    }

    /// Snapshot of the current membership in lexicographic order.
    pub async fn all_keys(&self) -> BTreeSet<Key> {
        let mut snapshot = BTreeSet::new();
        self.keys
            .iter_async(|key| {
                snapshot.insert(key.clone());
                true
            })
            .await;
        snapshot
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// Replace the whole membership with `keys`.
    ///
    /// Concurrent readers see each key either before or after the rebuild.
    pub async fn rebuild(&self, keys: impl IntoIterator<Item = Key>) {
        self.keys.clear_async().await;
        for key in keys {
            let _ = self.keys.insert_async(key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Key {
        Key::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let registry = KeyRegistry::new();
        registry.add(key("Steve")).await;
        registry.add(key("steve")).await;
        assert_eq!(registry.count(), 1);
        assert!(registry.exists("STEVE").await);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = KeyRegistry::new();
        registry.add(key("alex")).await;
        assert!(registry.remove(&key("Alex")).await);
        assert!(!registry.remove(&key("Alex")).await);
        assert!(!registry.exists("alex").await);
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_name_never_exists() {
        let registry = KeyRegistry::new();
        assert!(!registry.exists("").await);
    }

    #[tokio::test]
    async fn test_all_keys_sorted_and_matches_count() {
        let registry = KeyRegistry::new();
        for name in ["Notch", "jeb_", "Alex"] {
            registry.add(key(name)).await;
        }
        let all = registry.all_keys().await;
        let names: Vec<&str> = all.iter().map(Key::as_str).collect();
        assert_eq!(names, vec!["alex", "jeb_", "notch"]);
        assert_eq!(all.len(), registry.count());
    }

    #[tokio::test]
    async fn test_rebuild_replaces_membership() {
        let registry = KeyRegistry::new();
        registry.add(key("stale")).await;
        registry.rebuild([key("alice"), key("bob")]).await;
        assert!(!registry.exists("stale").await);
        assert!(registry.exists("Alice").await);
        assert_eq!(registry.count(), 2);

        registry.rebuild(Vec::new()).await;
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds() {
        let registry = std::sync::Arc::new(KeyRegistry::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.add(key(&format!("player{}", i % 8))).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.count(), 8);
        assert_eq!(registry.all_keys().await.len(), 8);
    }
}
