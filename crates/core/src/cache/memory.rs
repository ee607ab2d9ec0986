//! In-process cache store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::{Error, Response};

/// Cache store held entirely in memory.
///
/// Uses a tokio RwLock for concurrent access from event tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<BTreeMap<String, HashMap<String, Response>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, namespace: &str) -> Result<(), Error> {
        self.namespaces.write().await.entry(namespace.to_string()).or_default();
        Ok(())
    }

    async fn namespaces(&self) -> Result<Vec<String>, Error> {
        Ok(self.namespaces.read().await.keys().cloned().collect())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, Error> {
        Ok(self.namespaces.write().await.remove(namespace).is_some())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Response>, Error> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(namespace).and_then(|entries| entries.get(key)).cloned())
    }

    async fn put(&self, namespace: &str, key: &str, response: Response) -> Result<(), Error> {
        self.namespaces
            .write()
            .await
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }

    async fn put_all(&self, namespace: &str, entries: Vec<(String, Response)>) -> Result<(), Error> {
        let mut namespaces = self.namespaces.write().await;
        namespaces.entry(namespace.to_string()).or_default().extend(entries);
        Ok(())
    }

    async fn keys(&self, namespace: &str) -> Result<Vec<String>, Error> {
        let namespaces = self.namespaces.read().await;
        let mut keys: Vec<String> = namespaces
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_is_lazy_and_idempotent() {
        let store = MemoryStore::new();
        assert!(store.namespaces().await.unwrap().is_empty());
        store.open("a-cache-v1").await.unwrap();
        store.open("a-cache-v1").await.unwrap();
        assert_eq!(store.namespaces().await.unwrap(), vec!["a-cache-v1"]);
    }

    #[tokio::test]
    async fn test_get_missing_namespace_is_miss() {
        let store = MemoryStore::new();
        assert!(store.get("nope", "https://app.test/").await.unwrap().is_none());
        assert!(store.namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let store = MemoryStore::new();
        store.put("ns", "k", Response::new(200, "old")).await.unwrap();
        store.put("ns", "k", Response::new(200, "new")).await.unwrap();
        assert_eq!(store.get("ns", "k").await.unwrap().unwrap().body, "new");
    }

    #[tokio::test]
    async fn test_delete_namespace_drops_entries() {
        let store = MemoryStore::new();
        store.put("old-cache-v1", "k", Response::new(200, "x")).await.unwrap();
        assert!(store.delete_namespace("old-cache-v1").await.unwrap());
        assert!(!store.delete_namespace("old-cache-v1").await.unwrap());
        assert!(store.get("old-cache-v1", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let store = MemoryStore::new();
        store
            .put_all("ns", vec![("b".into(), Response::new(200, "")), ("a".into(), Response::new(200, ""))])
            .await
            .unwrap();
        assert_eq!(store.keys("ns").await.unwrap(), vec!["a", "b"]);
    }
}
