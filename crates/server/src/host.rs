//! Capability state of the reference host.
//!
//! The host records what the router asked of it. Nothing here changes how
//! requests are served; it mirrors the browser-side effects so callers can
//! observe them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_core::Error;
use shellcache_worker::HostCapabilities;

/// Host-side flags flipped by the lifecycle handlers.
#[derive(Debug, Default)]
pub struct HostState {
    preload_supported: bool,
    preload_enabled: AtomicBool,
    skip_waiting: AtomicUsize,
    claimed: AtomicBool,
}

/// Snapshot of [`HostState`] reported by the tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HostStatus {
    pub preload_enabled: bool,
    pub skip_waiting: usize,
    pub claimed: bool,
}

impl HostState {
    pub fn new(preload_supported: bool) -> Self {
        Self { preload_supported, ..Default::default() }
    }

    pub fn preload_enabled(&self) -> bool {
        self.preload_enabled.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> HostStatus {
        HostStatus {
            preload_enabled: self.preload_enabled(),
            skip_waiting: self.skip_waiting.load(Ordering::SeqCst),
            claimed: self.claimed.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl HostCapabilities for HostState {
    async fn enable_navigation_preload(&self) -> Result<(), Error> {
        if !self.preload_supported {
            return Err(Error::Unsupported("navigation preload".into()));
        }
        self.preload_enabled.store(true, Ordering::SeqCst);
        tracing::info!("navigation preload enabled");
        Ok(())
    }

    async fn skip_waiting(&self) -> Result<(), Error> {
        let count = self.skip_waiting.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(count, "skip waiting requested");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        self.claimed.store(true, Ordering::SeqCst);
        tracing::info!("clients claimed");
        Ok(())
    }
}
