//! sw_install, sw_activate and sw_message tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_core::CacheStore;
use shellcache_worker::{ControlMessage, LifecycleHandler, Router};

use super::json_result;
use crate::host::{HostState, HostStatus};

/// Output from the sw_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallOutput {
    /// The namespace that was populated.
    pub namespace: String,
    /// Number of entries now stored in it.
    pub entries: usize,
    pub host: HostStatus,
}

/// Output from the sw_activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActivateOutput {
    pub namespace: String,
    /// Namespaces left in the store after the purge.
    pub namespaces: Vec<String>,
    pub host: HostStatus,
}

/// Parameters for the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwMessageParams {
    /// Message payload, e.g. "SKIP_WAITING".
    pub data: String,
}

/// Output from the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageOutput {
    /// Whether the payload was a recognised control message.
    pub recognised: bool,
    pub host: HostStatus,
}

pub async fn install_impl(router: &Router, host: &HostState) -> Result<CallToolResult, McpError> {
    router.install().await?;
    let entries = router.store().keys(router.namespace()).await?.len();

    json_result(&InstallOutput { namespace: router.namespace().to_string(), entries, host: host.status() })
}

pub async fn activate_impl(router: &Router, host: &HostState) -> Result<CallToolResult, McpError> {
    router.activate().await?;
    let namespaces = router.store().namespaces().await?;

    json_result(&ActivateOutput { namespace: router.namespace().to_string(), namespaces, host: host.status() })
}

pub async fn message_impl(
    router: &Router, host: &HostState, params: SwMessageParams,
) -> Result<CallToolResult, McpError> {
    let recognised = !matches!(ControlMessage::parse(&params.data), ControlMessage::Other(_));
    router.message(&params.data).await?;

    json_result(&MessageOutput { recognised, host: host.status() })
}
