//! Stale-while-revalidate for third-party CDN assets.

use std::sync::Arc;

use shellcache_client::Network;
use shellcache_core::{CacheHandle, Error, Request, Response};
use tokio::sync::oneshot;

use crate::background::Background;

/// Answer from the cache immediately while refreshing the entry in the background.
///
/// The background fetch stores ok responses and swallows failures. Without a
/// cached entry the caller waits for that fetch; if it produced nothing, one
/// direct fetch is attempted and its failure propagates.
pub async fn stale_while_revalidate(
    cache: &CacheHandle, network: &Arc<dyn Network>, background: &Background, request: &Request,
) -> Result<Response, Error> {
    let cached = cache.match_request(request).await?;

    let (tx, rx) = oneshot::channel();
    let revalidate = {
        let cache = cache.clone();
        let network = Arc::clone(network);
        let request = request.clone();
        async move {
            let fresh = match network.fetch(&request).await {
                Ok(response) => {
                    if response.is_ok() {
                        let _ = cache.put(request.cache_key(), response.clone()).await;
                    }
                    Some(response)
                }
                Err(_) => None,
            };
            // The caller may already have answered from the cache.
            let _ = tx.send(fresh);
        }
    };
    background.spawn(revalidate);

    if let Some(stale) = cached {
        return Ok(stale);
    }

    if let Ok(Some(fresh)) = rx.await {
        return Ok(fresh);
    }

    network.fetch(request).await
}
