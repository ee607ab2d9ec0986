//! Routing inputs derived from configuration: the worker scope, the
//! application origin and the CDN hostname suffix.

use shellcache_client::{parse_scope, resolve_key};
use shellcache_core::{AppConfig, Error};
use url::{Origin, Url};

/// Where the application lives and which third-party host counts as its CDN.
#[derive(Debug, Clone)]
pub struct RouteScope {
    scope: Url,
    origin: Origin,
    cdn_host_suffix: String,
}

impl RouteScope {
    pub fn new(scope: Url, cdn_host_suffix: &str) -> Self {
        let origin = scope.origin();
        Self { scope, origin, cdn_host_suffix: cdn_host_suffix.to_ascii_lowercase() }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let scope = parse_scope(&config.scope)?;
        Ok(Self::new(scope, &config.cdn_host_suffix))
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub fn cdn_host_suffix(&self) -> &str {
        &self.cdn_host_suffix
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    /// Hostname ends with the CDN suffix. Opaque hosts never match.
    pub fn is_cdn(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| host.ends_with(&self.cdn_host_suffix))
    }

    /// Resolve a cache key such as `./` or `/index.html` to an absolute URL.
    pub fn resolve(&self, key: &str) -> Result<Url, Error> {
        Ok(resolve_key(&self.scope, key)?)
    }
}
