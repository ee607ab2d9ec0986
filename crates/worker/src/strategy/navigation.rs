//! Network-first navigations with an offline fallback to the app shell.

use shellcache_client::Network;
use shellcache_core::{CacheHandle, Error, Request, Response};

use crate::host::Preload;
use crate::scope::RouteScope;

/// Key refreshed by every successful navigation, whatever path was requested.
pub const ROOT_KEY: &str = "./";

/// Keys tried in order when the network is unavailable.
pub const FALLBACK_KEYS: &[&str] = &["./", "./index.html", "/index.html"];

/// Serve a navigation.
///
/// A preload response is returned as-is. A network response refreshes the
/// shell root entry before being returned. When neither is available the
/// first cached fallback wins, else the synthetic error response.
///
/// Only cache lookups during the fallback can fail this call.
pub async fn navigation(
    cache: &CacheHandle, network: &dyn Network, scope: &RouteScope, request: &Request, preload: Option<Preload>,
) -> Result<Response, Error> {
    match fetch_fresh(network, request, preload).await {
        Ok(Fresh::Preloaded(response)) => Ok(response),
        Ok(Fresh::Network(response)) => {
            // A failed refresh of the root entry does not fail the navigation.
            if let Ok(root) = scope.resolve(ROOT_KEY) {
                let _ = cache.put(root.as_str(), response.clone()).await;
            }
            Ok(response)
        }
        Err(_) => offline_fallback(cache, scope).await,
    }
}

enum Fresh {
    Preloaded(Response),
    Network(Response),
}

async fn fetch_fresh(network: &dyn Network, request: &Request, preload: Option<Preload>) -> Result<Fresh, Error> {
    if let Some(preload) = preload
        && let Some(response) = preload.await?
    {
        return Ok(Fresh::Preloaded(response));
    }
    network.fetch(request).await.map(Fresh::Network)
}

async fn offline_fallback(cache: &CacheHandle, scope: &RouteScope) -> Result<Response, Error> {
    for key in FALLBACK_KEYS {
        let url = scope.resolve(key)?;
        if let Some(hit) = cache.match_key(url.as_str()).await? {
            return Ok(hit);
        }
    }
    Ok(Response::error())
}
