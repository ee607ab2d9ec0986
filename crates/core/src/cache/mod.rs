//! Namespaced response cache.
//!
//! A store holds any number of named namespaces, each mapping request keys
//! to complete responses. Two backends are provided:
//!
//! - `MemoryStore`: process-local, lost on exit
//! - `SqliteStore`: persistent, with automatic schema migrations and WAL mode
//!
//! Both create a namespace lazily on first `open` or write, and delete it
//! wholesale with `delete_namespace`.

pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;

use std::sync::Arc;

use async_trait::async_trait;

pub use crate::Error;
use crate::{Request, Response};

pub use connection::SqliteStore;
pub use memory::MemoryStore;

/// Async key-value store of responses, partitioned by namespace.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the namespace if it does not exist yet.
    async fn open(&self, namespace: &str) -> Result<(), Error>;

    /// Names of all existing namespaces, sorted.
    async fn namespaces(&self) -> Result<Vec<String>, Error>;

    /// Delete a namespace and every entry in it. Returns whether it existed.
    async fn delete_namespace(&self, namespace: &str) -> Result<bool, Error>;

    /// Look up a stored response. A missing namespace is a miss, not an error.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Response>, Error>;

    /// Store a response, replacing any previous entry under the same key.
    async fn put(&self, namespace: &str, key: &str, response: Response) -> Result<(), Error>;

    /// Store several responses at once; either all are written or none.
    async fn put_all(&self, namespace: &str, entries: Vec<(String, Response)>) -> Result<(), Error>;

    /// Keys stored in a namespace, sorted.
    async fn keys(&self, namespace: &str) -> Result<Vec<String>, Error>;
}

/// Handle to one opened namespace.
#[derive(Clone)]
pub struct CacheHandle {
    store: Arc<dyn CacheStore>,
    name: String,
}

impl CacheHandle {
    /// Open (creating if needed) a namespace in the store.
    pub async fn open(store: Arc<dyn CacheStore>, name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        store.open(&name).await?;
        Ok(Self { store, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn match_key(&self, key: &str) -> Result<Option<Response>, Error> {
        self.store.get(&self.name, key).await
    }

    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.match_key(request.cache_key()).await
    }

    pub async fn put(&self, key: &str, response: Response) -> Result<(), Error> {
        self.store.put(&self.name, key, response).await
    }

    pub async fn put_all(&self, entries: Vec<(String, Response)>) -> Result<(), Error> {
        self.store.put_all(&self.name, entries).await
    }

    pub async fn keys(&self) -> Result<Vec<String>, Error> {
        self.store.keys(&self.name).await
    }
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle").field("name", &self.name).finish()
    }
}
