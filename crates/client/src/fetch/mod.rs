//! Network fetch primitive.
//!
//! ### Contract
//! - One request in, one complete response out.
//! - Any status (including 4xx/5xx) is a successful fetch; only transport
//!   failures (connectivity, DNS, TLS, unsupported scheme) are errors.
//! - No caching, no retries. The transport timeout is the only limit.

pub mod url;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, header};

pub use self::url::{UrlError, parse_request_url, parse_scope, resolve_key};

use shellcache_core::{Error, Request, Response, ResponseKind};

/// The network fetch primitive consumed by the router.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform a fetch. Fails only when no response could be obtained.
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Configuration for the HTTP network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// User agent string (default: "shellcache/0.1")
    pub user_agent: String,

    /// Transport timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { user_agent: "shellcache/0.1".to_string(), timeout: Duration::from_millis(20000), max_redirects: 5 }
    }
}

impl NetworkConfig {
    pub fn from_app_config(config: &shellcache_core::AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// Network fetches over HTTP(S) using reqwest.
pub struct HttpNetwork {
    http: Client,
    config: NetworkConfig,
}

impl HttpNetwork {
    /// Create a new HTTP network with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

/// Collapse a header map into lowercase names, joining repeated values.
fn collect_headers(headers: &header::HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else { continue };
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    out
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let url = &request.url;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Network(format!("cannot fetch {} URLs", url.scheme())));
        }

        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        let mut builder = self.http.request(method, url.as_str());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        let headers = collect_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response from {}: {}", url, e)))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} {} -> {} in {}ms ({} bytes)",
            request.method,
            url,
            status.as_u16(),
            fetch_ms,
            body.len()
        );

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            kind: ResponseKind::Basic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.user_agent, "shellcache/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_network_config_from_app_config() {
        let app = shellcache_core::AppConfig { user_agent: "player/6".into(), timeout_ms: 1500, ..Default::default() };
        let config = NetworkConfig::from_app_config(&app);
        assert_eq!(config.user_agent, "player/6");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_collect_headers_joins_repeats() {
        let mut headers = header::HeaderMap::new();
        headers.append(header::CACHE_CONTROL, "no-cache".parse().unwrap());
        headers.append(header::CACHE_CONTROL, "no-store".parse().unwrap());
        headers.insert(header::CONTENT_TYPE, "text/html".parse().unwrap());

        let collected = collect_headers(&headers);
        assert_eq!(collected.get("cache-control").map(String::as_str), Some("no-cache, no-store"));
        assert_eq!(collected.get("content-type").map(String::as_str), Some("text/html"));
    }

    #[tokio::test]
    async fn test_http_network_new() {
        let network = HttpNetwork::new(NetworkConfig::default());
        assert!(network.is_ok());
    }

    #[tokio::test]
    async fn test_blob_url_is_not_fetchable() {
        let network = HttpNetwork::new(NetworkConfig::default()).unwrap();
        let request = Request::get(parse_request_url("blob:https://app.test/5b0f1c2e").unwrap());
        let result = network.fetch(&request).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
