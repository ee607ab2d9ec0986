//! MCP tool implementations.
//!
//! Tools exposed by the reference host.

pub mod cache;
pub mod fetch;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod testing;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::HostError;

pub use cache::{CacheListParams, list_impl};
pub use fetch::{SwFetchParams, fetch_impl};
pub use lifecycle::{SwMessageParams, activate_impl, install_impl, message_impl};

/// Wrap a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(HostError::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
