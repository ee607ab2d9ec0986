//! Unified error types for shellcache.
//!
//! Messages carry a stable code prefix so hosts can surface them unchanged.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

const CONNECTION_CLOSED: &str = "connection closed";

/// Unified error types for the cache router and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown request mode).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A URL could not be parsed or resolved.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Cache store operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// The cache store cannot be reached at all.
    #[error("STORE_ERROR: unavailable: {0}")]
    StoreUnavailable(String),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Network fetch failed (connectivity, DNS, TLS, ...).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// A fetch completed but with a status that cannot be precached.
    #[error("HTTP_ERROR: {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The navigation preload response was rejected.
    #[error("PRELOAD_FAILED: {0}")]
    PreloadFailed(String),

    /// The host does not support the requested capability.
    #[error("UNSUPPORTED: {0}")]
    Unsupported(String),

    /// Stored data could not be encoded or decoded.
    #[error("STORE_ERROR: serialization failed: {0}")]
    Serialization(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::StoreUnavailable(CONNECTION_CLOSED.into()),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::StoreUnavailable(CONNECTION_CLOSED.into()),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::ConnectionClosed => Error::StoreUnavailable(CONNECTION_CLOSED.into()),
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::Network(msg) => (-32008, msg.clone()),
            Error::HttpStatus { .. } => (-32008, err.to_string()),
            Error::PreloadFailed(msg) => (-32009, msg.clone()),
            Error::Unsupported(msg) => (-32010, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::StoreUnavailable(msg) => (-32002, msg.clone()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Serialization(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
