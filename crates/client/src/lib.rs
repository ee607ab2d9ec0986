//! Client code for shellcache.
//!
//! This crate provides the network fetch primitive used by the router and
//! URL helpers for request parsing and cache key resolution.

pub mod fetch;

pub use fetch::{HttpNetwork, Network, NetworkConfig, UrlError, parse_request_url, parse_scope, resolve_key};
