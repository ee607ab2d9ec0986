//! cache_list tool implementation.
//!
//! Lists the namespaces in the store, or the keys stored in one namespace.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_core::CacheStore;

use crate::tools::json_result;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Namespace whose keys to list. Lists namespaces when omitted.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub namespace: Option<String>,
    /// Namespace names, or cache keys when a namespace was given. Sorted.
    pub items: Vec<String>,
}

pub async fn list_impl(store: &dyn CacheStore, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let items = match params.namespace.as_deref() {
        Some(namespace) => store.keys(namespace).await?,
        None => store.namespaces().await?,
    };

    json_result(&CacheListOutput { namespace: params.namespace, items })
}
