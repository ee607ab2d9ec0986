//! Install and activate work: shell precaching and stale namespace eviction.

use futures_util::future::try_join_all;
use shellcache_client::Network;
use shellcache_core::{CacheHandle, CacheStore, Error, Request};

/// Delete every namespace other than `active`, waiting for all deletions.
///
/// Returns the deleted names. Any store failure fails the whole call; there is
/// no retry. Running it again is a no-op.
pub async fn purge_stale_namespaces(store: &dyn CacheStore, active: &str) -> Result<Vec<String>, Error> {
    let stale: Vec<String> = store
        .namespaces()
        .await?
        .into_iter()
        .filter(|name| name != active)
        .collect();

    try_join_all(stale.iter().map(|name| store.delete_namespace(name))).await?;

    Ok(stale)
}

/// Fetch every shell request and store the responses in one batch.
///
/// All-or-nothing: a transport failure or a non-ok status on any entry fails
/// the step before anything is written. Returns the number of entries stored.
pub async fn precache_shell(cache: &CacheHandle, network: &dyn Network, requests: &[Request]) -> Result<usize, Error> {
    let entries = try_join_all(requests.iter().map(|request| async move {
        let response = network.fetch(request).await?;
        if !response.is_ok() {
            return Err(Error::HttpStatus { url: request.url.to_string(), status: response.status });
        }
        Ok((request.cache_key().to_string(), response))
    }))
    .await?;

    let count = entries.len();
    cache.put_all(entries).await?;
    Ok(count)
}
