//! Request routing and cache lifecycle for shellcache.
//!
//! The [`Router`] reacts to host events:
//!
//! - `install`: precache the versioned shell into the active namespace
//! - `activate`: enable navigation preload if possible, delete stale namespaces, claim pages
//! - `message`: `SKIP_WAITING` activates immediately
//! - `fetch`: classify the request and run one strategy
//!
//! Strategies: network-first navigations with a shell fallback, cache-first
//! for same-origin assets, stale-while-revalidate for the CDN. Everything else
//! passes through to the host untouched.

pub mod background;
pub mod classify;
pub mod host;
pub mod lifecycle;
pub mod router;
pub mod scope;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use classify::{Route, classify};
pub use host::{ControlMessage, FetchDisposition, FetchEvent, HostCapabilities, LifecycleHandler, Preload, SKIP_WAITING};
pub use router::Router;
pub use scope::RouteScope;
