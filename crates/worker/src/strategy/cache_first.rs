//! Cache-first for same-origin static assets.

use shellcache_client::Network;
use shellcache_core::{CacheHandle, Error, Request, Response};

/// Serve from the cache when possible, never revalidating a hit.
///
/// On a miss the network response is returned; only ok responses are stored.
/// A network failure on a miss propagates.
pub async fn cache_first(cache: &CacheHandle, network: &dyn Network, request: &Request) -> Result<Response, Error> {
    if let Some(hit) = cache.match_request(request).await? {
        return Ok(hit);
    }

    let response = network.fetch(request).await?;
    if response.is_ok() {
        // The page gets its response even if the copy could not be stored.
        let _ = cache.put(request.cache_key(), response.clone()).await;
    }
    Ok(response)
}
