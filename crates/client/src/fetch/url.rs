//! URL parsing for intercepted requests and cache key resolution.

use url::Url;

/// Schemes a request URL may carry. `blob:` and `filesystem:` are accepted so the
/// router can recognise and pass them through.
pub const REQUEST_SCHEMES: &[&str] = &["http", "https", "blob", "filesystem"];

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for shellcache_core::Error {
    fn from(err: UrlError) -> Self {
        shellcache_core::Error::InvalidUrl(err.to_string())
    }
}

/// Parse an absolute request URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Lowercase the host (done by the parser for special schemes)
/// 3. Remove fragment (#...), which never reaches the network
/// 4. Keep query string intact (do not reorder)
pub fn parse_request_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if !REQUEST_SCHEMES.contains(&parsed.scheme()) {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Parse the worker scope: an absolute http(s) URL that relative keys resolve against.
pub fn parse_scope(input: &str) -> Result<Url, UrlError> {
    let scope = parse_request_url(input)?;
    match scope.scheme() {
        "http" | "https" => Ok(scope),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Resolve a cache key (`./`, `./index.html`, `/index.html`, or absolute) against the scope.
pub fn resolve_key(scope: &Url, key: &str) -> Result<Url, UrlError> {
    if key.trim().is_empty() {
        return Err(UrlError::Empty);
    }
    scope.join(key.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}
