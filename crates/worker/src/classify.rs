//! Request classification.
//!
//! Rules are evaluated in order, first match wins:
//!
//! 1. non-GET → `Ignore`
//! 2. `navigate` mode → `Navigation`
//! 3. `range` header, `blob:` or `filesystem:` URL → `Ignore`
//! 4. same origin as the app → `CacheFirst`
//! 5. hostname ends with the CDN suffix → `StaleWhileRevalidate`
//! 6. anything else → `Ignore`
//!
//! Range and scheme checks run before the origin checks: a partial-content
//! request must never be answered from a whole-body cache entry, and blob URLs
//! report their creator's origin.

use shellcache_core::{Method, Request, RequestMode};

use crate::scope::RouteScope;

/// The strategy bucket a request falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted; the host performs its default fetch.
    Ignore,
    Navigation,
    CacheFirst,
    StaleWhileRevalidate,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Ignore => "ignore",
            Route::Navigation => "navigation",
            Route::CacheFirst => "cache-first",
            Route::StaleWhileRevalidate => "stale-while-revalidate",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a request to exactly one route.
pub fn classify(request: &Request, scope: &RouteScope) -> Route {
    if request.method != Method::Get {
        return Route::Ignore;
    }

    if request.mode == RequestMode::Navigate {
        return Route::Navigation;
    }

    if request.has_header("range") || matches!(request.url.scheme(), "blob" | "filesystem") {
        return Route::Ignore;
    }

    if scope.is_same_origin(&request.url) {
        return Route::CacheFirst;
    }

    if scope.is_cdn(&request.url) {
        return Route::StaleWhileRevalidate;
    }

    Route::Ignore
}
