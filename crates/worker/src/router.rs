//! The cache router: lifecycle handling and fetch dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use shellcache_client::Network;
use shellcache_core::{AppConfig, CacheHandle, CacheStore, Error, Request, ShellManifest};

use crate::background::Background;
use crate::classify::{Route, classify};
use crate::host::{ControlMessage, FetchDisposition, FetchEvent, HostCapabilities, LifecycleHandler};
use crate::lifecycle;
use crate::scope::RouteScope;
use crate::strategy;

/// Routes intercepted requests through the active cache namespace.
pub struct Router {
    scope: RouteScope,
    version: String,
    namespace: String,
    manifest: ShellManifest,
    skip_waiting_on_install: bool,
    store: Arc<dyn CacheStore>,
    network: Arc<dyn Network>,
    host: Arc<dyn HostCapabilities>,
    background: Background,
}

impl Router {
    /// Build a router for the configured version.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the configured scope is not an absolute http(s) URL.
    pub fn new(
        config: &AppConfig, store: Arc<dyn CacheStore>, network: Arc<dyn Network>, host: Arc<dyn HostCapabilities>,
    ) -> Result<Self, Error> {
        Ok(Self {
            scope: RouteScope::from_config(config)?,
            version: config.version.clone(),
            namespace: config.namespace(),
            manifest: config.shell_manifest(),
            skip_waiting_on_install: config.skip_waiting_on_install,
            store,
            network,
            host,
            background: Background::new(),
        })
    }

    /// Name of the namespace this router reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn scope(&self) -> &RouteScope {
        &self.scope
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// The decorated shell requests, resolved against the scope, in manifest order.
    pub fn shell_requests(&self) -> Result<Vec<Request>, Error> {
        self.manifest
            .versioned(&self.version)
            .iter()
            .map(|url| self.scope.resolve(url).map(Request::get))
            .collect()
    }

    async fn cache(&self) -> Result<CacheHandle, Error> {
        CacheHandle::open(Arc::clone(&self.store), self.namespace.as_str()).await
    }

    /// Populate the active namespace with the shell manifest.
    pub async fn precache_shell(&self) -> Result<usize, Error> {
        let requests = self.shell_requests()?;
        let cache = self.cache().await?;
        lifecycle::precache_shell(&cache, self.network.as_ref(), &requests).await
    }

    /// Delete every namespace but the active one.
    pub async fn purge_stale_namespaces(&self) -> Result<Vec<String>, Error> {
        lifecycle::purge_stale_namespaces(self.store.as_ref(), &self.namespace).await
    }

    /// Wait for background revalidations started so far.
    pub async fn settle(&self) {
        self.background.settle().await;
    }

    /// Run the strategy for an already classified request.
    pub async fn execute(&self, route: Route, event: FetchEvent) -> Result<FetchDisposition, Error> {
        let FetchEvent { request, preload } = event;
        let response = match route {
            Route::Ignore => return Ok(FetchDisposition::Passthrough),
            Route::Navigation => {
                let cache = self.cache().await?;
                strategy::navigation(&cache, self.network.as_ref(), &self.scope, &request, preload).await?
            }
            Route::CacheFirst => {
                let cache = self.cache().await?;
                strategy::cache_first(&cache, self.network.as_ref(), &request).await?
            }
            Route::StaleWhileRevalidate => {
                let cache = self.cache().await?;
                strategy::stale_while_revalidate(&cache, &self.network, &self.background, &request).await?
            }
        };
        Ok(FetchDisposition::Respond(response))
    }
}

#[async_trait]
impl LifecycleHandler for Router {
    async fn install(&self) -> Result<(), Error> {
        let count = self.precache_shell().await?;
        tracing::info!(namespace = %self.namespace, entries = count, "shell precached");

        if self.skip_waiting_on_install {
            self.host.skip_waiting().await?;
        }
        Ok(())
    }

    async fn activate(&self) -> Result<(), Error> {
        if let Err(e) = self.host.enable_navigation_preload().await {
            tracing::debug!("navigation preload not enabled: {}", e);
        }

        let deleted = self.purge_stale_namespaces().await?;
        for name in &deleted {
            tracing::info!(namespace = %name, "deleted stale cache namespace");
        }

        self.host.claim_clients().await?;
        tracing::info!(namespace = %self.namespace, "activated");
        Ok(())
    }

    async fn message(&self, data: &str) -> Result<(), Error> {
        match ControlMessage::parse(data) {
            ControlMessage::SkipWaiting => self.host.skip_waiting().await,
            ControlMessage::Other(_) => Ok(()),
        }
    }

    async fn fetch(&self, event: FetchEvent) -> Result<FetchDisposition, Error> {
        let route = classify(&event.request, &self.scope);
        tracing::debug!("{} {} -> {}", event.request.method, event.request.url, route);
        self.execute(route, event).await
    }
}
