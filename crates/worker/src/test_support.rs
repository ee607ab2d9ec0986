//! Test doubles for the router's collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use shellcache_client::Network;
use shellcache_core::{CacheStore, Error, MemoryStore, Request, Response};
use url::Url;

use crate::host::HostCapabilities;
use crate::scope::RouteScope;

pub fn scope() -> RouteScope {
    RouteScope::new(Url::parse("https://app.test/").unwrap(), "cdn.jsdelivr.net")
}

/// Network answering from a URL table; unknown URLs get a 404.
#[derive(Default)]
pub struct MockNetwork {
    responses: Mutex<HashMap<String, Response>>,
    calls: AtomicUsize,
    offline: AtomicBool,
    delay_ms: AtomicU64,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, response: Response) -> Self {
        self.set(url, response);
        self
    }

    /// Answer every fetch only after `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    pub fn offline(self) -> Self {
        self.set_offline(true);
        self
    }

    pub fn set(&self, url: &str, response: Response) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{}: offline", request.url)));
        }
        let responses = self.responses.lock().unwrap();
        Ok(responses.get(request.url.as_str()).cloned().unwrap_or_else(|| Response::new(404, "not found")))
    }
}

/// Memory store that counts every operation.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    ops: AtomicUsize,
    fail: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    /// Make every later operation fail like an unavailable store.
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn touch(&self) -> Result<(), Error> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for CountingStore {
    async fn open(&self, namespace: &str) -> Result<(), Error> {
        self.touch()?;
        self.inner.open(namespace).await
    }

    async fn namespaces(&self) -> Result<Vec<String>, Error> {
        self.touch()?;
        self.inner.namespaces().await
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, Error> {
        self.touch()?;
        self.inner.delete_namespace(namespace).await
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Response>, Error> {
        self.touch()?;
        self.inner.get(namespace, key).await
    }

    async fn put(&self, namespace: &str, key: &str, response: Response) -> Result<(), Error> {
        self.touch()?;
        self.inner.put(namespace, key, response).await
    }

    async fn put_all(&self, namespace: &str, entries: Vec<(String, Response)>) -> Result<(), Error> {
        self.touch()?;
        self.inner.put_all(namespace, entries).await
    }

    async fn keys(&self, namespace: &str) -> Result<Vec<String>, Error> {
        self.touch()?;
        self.inner.keys(namespace).await
    }
}

/// Host that records capability calls.
#[derive(Default)]
pub struct RecordingHost {
    pub preload_supported: bool,
    pub preload_enabled: AtomicBool,
    pub skip_waiting_calls: AtomicUsize,
    pub claim_calls: AtomicUsize,
}

impl RecordingHost {
    pub fn supporting_preload() -> Self {
        Self { preload_supported: true, ..Default::default() }
    }

    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claim_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostCapabilities for RecordingHost {
    async fn enable_navigation_preload(&self) -> Result<(), Error> {
        if !self.preload_supported {
            return Err(Error::Unsupported("navigation preload".into()));
        }
        self.preload_enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn skip_waiting(&self) -> Result<(), Error> {
        self.skip_waiting_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
