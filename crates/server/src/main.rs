//! shellcache host entry point.
//!
//! Boots the cache router behind an MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shellcache_client::{HttpNetwork, Network, NetworkConfig};
use shellcache_core::{AppConfig, CacheStore, MemoryStore, SqliteStore};
use shellcache_worker::Router;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod host;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        namespace = %config.namespace(),
        scope = %config.scope,
        "Starting shellcache host on stdio transport"
    );

    let store: Arc<dyn CacheStore> = match &config.db_path {
        Some(path) => Arc::new(SqliteStore::open(path).await?),
        None => Arc::new(MemoryStore::new()),
    };
    let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(NetworkConfig::from_app_config(&config))?);
    let host = Arc::new(host::HostState::new(true));
    let router = Router::new(&config, store, Arc::clone(&network), host.clone())?;

    let handler = handler::ShellcacheHost::new(router, network, host);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
