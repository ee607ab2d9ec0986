//! Request and response types shared by the router, the store and the network.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::Error;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            other => Err(Error::InvalidInput(format!("unsupported method: {other}"))),
        }
    }
}

/// Request mode as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Navigate => "navigate",
            RequestMode::SameOrigin => "same-origin",
            RequestMode::NoCors => "no-cors",
            RequestMode::Cors => "cors",
        }
    }
}

impl FromStr for RequestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navigate" => Ok(RequestMode::Navigate),
            "same-origin" => Ok(RequestMode::SameOrigin),
            "no-cors" => Ok(RequestMode::NoCors),
            "cors" => Ok(RequestMode::Cors),
            other => Err(Error::InvalidInput(format!("unsupported request mode: {other}"))),
        }
    }
}

/// An intercepted request.
///
/// Header names are stored lowercased. The URL never carries a fragment, so
/// `page.js` and `page.js#top` share one cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub mode: RequestMode,
    pub url: Url,
    headers: BTreeMap<String, String>,
}

impl Request {
    pub fn new(method: Method, mut url: Url) -> Self {
        url.set_fragment(None);
        Self { method, mode: RequestMode::default(), url, headers: BTreeMap::new() }
    }

    /// A GET sub-resource request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// A GET request in `navigate` mode.
    pub fn navigate(url: Url) -> Self {
        Self { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The cache key this request is stored under: the URL up to its query.
    pub fn cache_key(&self) -> &str {
        &self.url[..Position::AfterQuery]
    }
}

/// Classification of a response, mirroring the host's response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Basic,
    Cors,
    Opaque,
    /// Synthetic network error: no status, no body.
    Error,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Cors => "cors",
            ResponseKind::Opaque => "opaque",
            ResponseKind::Error => "error",
        }
    }
}

impl FromStr for ResponseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ResponseKind::Basic),
            "cors" => Ok(ResponseKind::Cors),
            "opaque" => Ok(ResponseKind::Opaque),
            "error" => Ok(ResponseKind::Error),
            other => Err(Error::Serialization(format!("unknown response kind: {other}"))),
        }
    }
}

/// A complete response: status, headers and the whole body.
///
/// Cloning is cheap; the body is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: BTreeMap::new(),
            body: body.into(),
            kind: ResponseKind::Basic,
        }
    }

    /// The synthetic network-error response (`Response.error()` on the web platform).
    pub fn error() -> Self {
        Self { kind: ResponseKind::Error, ..Self::new(0, Bytes::new()) }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// True for a 2xx status.
    pub fn is_ok(&self) -> bool {
        self.kind != ResponseKind::Error && (200..300).contains(&self.status)
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResponseKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!(" POST ".parse::<Method>().unwrap(), Method::Post);
        assert!(matches!("BREW".parse::<Method>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("navigate".parse::<RequestMode>().unwrap(), RequestMode::Navigate);
        assert_eq!("no-cors".parse::<RequestMode>().unwrap(), RequestMode::NoCors);
        assert!("websocket".parse::<RequestMode>().is_err());
    }

    #[test]
    fn test_request_headers_case_insensitive() {
        let req = Request::get(url("https://app.test/video.mp4")).with_header("Range", "bytes=0-");
        assert!(req.has_header("range"));
        assert_eq!(req.header("RANGE"), Some("bytes=0-"));
    }

    #[test]
    fn test_navigate_constructor() {
        let req = Request::navigate(url("https://app.test/gallery"));
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.mode, RequestMode::Navigate);
        assert_eq!(req.cache_key(), "https://app.test/gallery");
    }

    #[test]
    fn test_cache_key_drops_fragment() {
        let plain = Request::get(url("https://app.test/js/app.js"));
        let anchored = Request::get(url("https://app.test/js/app.js#x"));
        assert_eq!(anchored.cache_key(), "https://app.test/js/app.js");
        assert_eq!(plain.cache_key(), anchored.cache_key());
        assert_eq!(Request::navigate(url("https://app.test/#/gallery")).url.as_str(), "https://app.test/");

        let mut moved = Request::get(url("https://app.test/js/app.js?v=6"));
        moved.url.set_fragment(Some("later"));
        assert_eq!(moved.cache_key(), "https://app.test/js/app.js?v=6");
    }

    #[test]
    fn test_response_ok_range() {
        assert!(Response::new(200, "x").is_ok());
        assert!(Response::new(204, "").is_ok());
        assert!(!Response::new(304, "").is_ok());
        assert!(!Response::new(500, "boom").is_ok());
    }

    #[test]
    fn test_error_response_has_no_status_or_body() {
        let resp = Response::error();
        assert_eq!(resp.status, 0);
        assert!(resp.body.is_empty());
        assert!(resp.is_error());
        assert!(!resp.is_ok());
    }

    #[test]
    fn test_response_content_type() {
        let resp = Response::new(200, "<html>").with_header("Content-Type", "text/html");
        assert_eq!(resp.content_type(), Some("text/html"));
    }
}
