//! Core types and shared functionality for shellcache.
//!
//! This crate provides:
//! - Request/response model
//! - Namespaced cache store (in-memory and SQLite backends)
//! - Version namespaces and the shell manifest
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod namespace;

pub use cache::{CacheHandle, CacheStore, MemoryStore, SqliteStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{Method, Request, RequestMode, Response, ResponseKind};
pub use namespace::{ShellManifest, namespace_name, with_version};
