//! sw_fetch tool implementation.
//!
//! Routes one request through the cache router the way a browser would
//! dispatch a fetch event. Passthrough requests get the host's default
//! network fetch.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{Network, parse_request_url};
use shellcache_core::{Error, Method, Request, RequestMode, Response};
use shellcache_worker::{FetchDisposition, FetchEvent, Preload, Router, classify};

use super::json_result;
use crate::error::HostError;
use crate::host::HostState;

const PREVIEW_CHARS: usize = 200;

/// Parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute request URL.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default)]
    pub method: Option<String>,

    /// Request mode: "navigate", "same-origin", "no-cors" or "cors" (default).
    #[serde(default)]
    pub mode: Option<String>,

    /// Request headers, e.g. {"range": "bytes=0-"}.
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Output from the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    pub url: String,
    /// Route the request was classified into.
    pub route: String,
    /// False when the router let the host fetch on its own.
    pub intercepted: bool,
    pub status: u16,
    pub ok: bool,
    /// "basic", "cors", "opaque" or "error".
    pub kind: String,
    pub content_type: Option<String>,
    pub body_length: usize,
    /// Leading characters of the body, decoded lossily as UTF-8.
    pub preview: String,
}

impl SwFetchParams {
    fn into_request(self) -> Result<Request, McpError> {
        let url = parse_request_url(&self.url).map_err(Error::from)?;
        let method = self.method.as_deref().map(str::parse::<Method>).transpose()?.unwrap_or(Method::Get);
        let mode = self.mode.as_deref().map(str::parse::<RequestMode>).transpose()?.unwrap_or_default();

        let mut request = Request::new(method, url).with_mode(mode);
        for (name, value) in self.headers.unwrap_or_default() {
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_graphic() && b != b':') {
                return Err(HostError::InvalidHeader(name).into());
            }
            if value.contains(['\r', '\n']) {
                return Err(HostError::InvalidHeader(format!("{name}: value contains a line break")).into());
            }
            request = request.with_header(&name, value);
        }
        Ok(request)
    }
}

/// Start a preload fetch for a navigation when the host has preload enabled.
fn navigation_preload(network: &Arc<dyn Network>, request: &Request) -> Preload {
    let network = Arc::clone(network);
    let request = request.clone();
    Box::pin(async move {
        network
            .fetch(&request)
            .await
            .map(Some)
            .map_err(|e| Error::PreloadFailed(e.to_string()))
    })
}

pub async fn fetch_impl(
    router: &Router, network: &Arc<dyn Network>, host: &HostState, params: SwFetchParams,
) -> Result<CallToolResult, McpError> {
    let request = params.into_request()?;
    let route = classify(&request, router.scope());

    let mut event = FetchEvent::new(request.clone());
    if request.mode == RequestMode::Navigate && host.preload_enabled() {
        event = event.with_preload(navigation_preload(network, &request));
    }

    let (intercepted, response) = match router.execute(route, event).await? {
        FetchDisposition::Respond(response) => (true, response),
        FetchDisposition::Passthrough => (false, network.fetch(&request).await?),
    };
    tracing::info!(url = %request.url, route = %route, intercepted, status = response.status, "fetch handled");

    json_result(&summarize(&request, route.as_str(), intercepted, &response))
}

fn summarize(request: &Request, route: &str, intercepted: bool, response: &Response) -> SwFetchOutput {
    SwFetchOutput {
        url: request.url.to_string(),
        route: route.to_string(),
        intercepted,
        status: response.status,
        ok: response.is_ok(),
        kind: response.kind.as_str().to_string(),
        content_type: response.content_type().map(str::to_string),
        body_length: response.body.len(),
        preview: String::from_utf8_lossy(&response.body).chars().take(PREVIEW_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StubNetwork, fixture, output_json};
    use shellcache_core::CacheStore;

    fn params(url: &str) -> SwFetchParams {
        SwFetchParams { url: url.into(), method: None, mode: None, headers: None }
    }

    #[tokio::test]
    async fn test_cache_first_asset() {
        let script = Response::new(200, "console.log(1)").with_header("content-type", "text/javascript");
        let network = StubNetwork::default().with("https://app.test/js/app.js", script);
        let f = fixture(network);
        let dyn_network: Arc<dyn Network> = f.network.clone();

        fetch_impl(&f.router, &dyn_network, &f.host, params("https://app.test/js/app.js")).await.unwrap();
        let result = fetch_impl(&f.router, &dyn_network, &f.host, params("https://app.test/js/app.js")).await.unwrap();

        let output = output_json(&result);
        assert_eq!(output["route"], "cache-first");
        assert_eq!(output["intercepted"], true);
        assert_eq!(output["content_type"], "text/javascript");
        assert_eq!(output["preview"], "console.log(1)");
        assert_eq!(f.network.calls(), 1);
    }

    #[tokio::test]
    async fn test_post_passes_through() {
        let network = StubNetwork::default().with("https://app.test/api", Response::new(201, "created"));
        let f = fixture(network);
        let dyn_network: Arc<dyn Network> = f.network.clone();

        let params = SwFetchParams { method: Some("post".into()), ..params("https://app.test/api") };
        let result = fetch_impl(&f.router, &dyn_network, &f.host, params).await.unwrap();

        let output = output_json(&result);
        assert_eq!(output["route"], "ignore");
        assert_eq!(output["intercepted"], false);
        assert_eq!(output["status"], 201);
        assert!(f.store.namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_request_passes_through() {
        let f = fixture(StubNetwork::default().with("https://app.test/tour.mp4", Response::new(206, "partial")));
        let dyn_network: Arc<dyn Network> = f.network.clone();

        let headers = BTreeMap::from([("Range".to_string(), "bytes=0-".to_string())]);
        let params = SwFetchParams { headers: Some(headers), ..params("https://app.test/tour.mp4") };
        let output = output_json(&fetch_impl(&f.router, &dyn_network, &f.host, params).await.unwrap());

        assert_eq!(output["intercepted"], false);
        assert_eq!(output["status"], 206);
        assert!(f.store.namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_stores_root() {
        let f = fixture(StubNetwork::default().with("https://app.test/gallery", Response::new(200, "<html>gallery")));
        let dyn_network: Arc<dyn Network> = f.network.clone();

        let params = SwFetchParams { mode: Some("navigate".into()), ..params("https://app.test/gallery") };
        let output = output_json(&fetch_impl(&f.router, &dyn_network, &f.host, params).await.unwrap());

        assert_eq!(output["route"], "navigation");
        let root = f.store.get("app-cache-v6", "https://app.test/").await.unwrap().unwrap();
        assert_eq!(root.body, "<html>gallery");
    }

    #[tokio::test]
    async fn test_navigation_uses_preload_once_enabled() {
        use shellcache_worker::LifecycleHandler;

        let f = fixture(StubNetwork::default().with("https://app.test/gallery", Response::new(200, "<html>gallery")));
        let dyn_network: Arc<dyn Network> = f.network.clone();
        f.router.activate().await.unwrap();
        assert!(f.host.preload_enabled());

        let params = SwFetchParams { mode: Some("navigate".into()), ..params("https://app.test/gallery") };
        let output = output_json(&fetch_impl(&f.router, &dyn_network, &f.host, params).await.unwrap());

        assert_eq!(output["preview"], "<html>gallery");
        assert_eq!(f.network.calls(), 1);
        assert!(f.store.get("app-cache-v6", "https://app.test/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected() {
        let f = fixture(StubNetwork::default());
        let dyn_network: Arc<dyn Network> = f.network.clone();

        let err = fetch_impl(&f.router, &dyn_network, &f.host, params("not a url")).await.unwrap_err();
        assert_eq!(err.code.0, -32003);

        let bad_mode = SwFetchParams { mode: Some("websocket".into()), ..params("https://app.test/") };
        let err = fetch_impl(&f.router, &dyn_network, &f.host, bad_mode).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let headers = BTreeMap::from([("bad header".to_string(), "x".to_string())]);
        let bad_header = SwFetchParams { headers: Some(headers), ..params("https://app.test/") };
        let err = fetch_impl(&f.router, &dyn_network, &f.host, bad_header).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert_eq!(f.network.calls(), 0);
    }

    #[test]
    fn test_summarize_error_response() {
        let request = Request::navigate(url::Url::parse("https://app.test/").unwrap());
        let output = summarize(&request, "navigation", true, &Response::error());
        assert_eq!(output.kind, "error");
        assert_eq!(output.status, 0);
        assert!(!output.ok);
        assert_eq!(output.body_length, 0);
    }
}
