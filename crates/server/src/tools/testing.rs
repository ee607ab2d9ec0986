//! Shared fixtures for tool tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use shellcache_client::Network;
use shellcache_core::{AppConfig, CacheStore, Error, MemoryStore, Request, Response};
use shellcache_worker::Router;

use crate::host::HostState;

/// Network answering from a fixed URL table; unknown URLs get a 404.
#[derive(Default)]
pub struct StubNetwork {
    responses: HashMap<String, Response>,
    calls: AtomicUsize,
}

impl StubNetwork {
    pub fn with(mut self, url: &str, response: Response) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.responses.get(request.url.as_str()).cloned().unwrap_or_else(|| Response::new(404, "not found")))
    }
}

/// Stub serving every default shell entry at version 6 under https://app.test/.
pub fn shell_network() -> StubNetwork {
    AppConfig::default()
        .shell_manifest()
        .versioned("6")
        .iter()
        .fold(StubNetwork::default(), |network, entry| {
            let url = format!("https://app.test/{}", entry.trim_start_matches("./"));
            network.with(&url, Response::new(200, format!("shell {entry}")))
        })
}

pub struct Fixture {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub network: Arc<StubNetwork>,
    pub host: Arc<HostState>,
}

pub fn fixture(network: StubNetwork) -> Fixture {
    let config = AppConfig {
        app_name: "app".into(),
        version: "6".into(),
        scope: "https://app.test/".into(),
        ..Default::default()
    };
    let store = Arc::new(MemoryStore::new());
    let network = Arc::new(network);
    let host = Arc::new(HostState::new(true));
    let router = Router::new(&config, store.clone() as Arc<dyn CacheStore>, network.clone(), host.clone()).unwrap();
    Fixture { router, store, network, host }
}

/// Parse the JSON text of a successful tool result.
pub fn output_json(result: &CallToolResult) -> serde_json::Value {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
