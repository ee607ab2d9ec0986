//! MCP server handler implementation.
//!
//! This module defines the reference host: it owns the router and the host
//! capability state and routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shellcache_client::Network;
use shellcache_worker::Router;

use crate::host::HostState;
use crate::tools::{
    CacheListParams, SwFetchParams, SwMessageParams, activate_impl, fetch_impl, install_impl, list_impl, message_impl,
};

/// The main MCP server handler for shellcache.
#[derive(Clone)]
pub struct ShellcacheHost {
    router: Arc<Router>,
    network: Arc<dyn Network>,
    host: Arc<HostState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl ShellcacheHost {
    /// Create a new server handler.
    pub fn new(router: Router, network: Arc<dyn Network>, host: Arc<HostState>) -> Self {
        Self { router: Arc::new(router), network, host, tool_router: Self::tool_router() }
    }

    #[tool(description = "Run the install event: precache the versioned app shell into the active cache namespace.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.router, &self.host).await
    }

    #[tool(description = "Run the activate event: enable navigation preload, then delete old cache namespaces.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.router, &self.host).await
    }

    #[tool(description = "Deliver a message to the worker. \"SKIP_WAITING\" activates the waiting version.")]
    async fn sw_message(&self, params: Parameters<SwMessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.router, &self.host, params.0).await
    }

    /// Route one request through the cache router.
    ///
    /// Requests the router does not intercept are fetched from the network directly.
    #[tool(description = "Route one request through the cache router and summarize the response and the route taken.")]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.router, &self.network, &self.host, params.0).await
    }

    #[tool(description = "List cache namespaces, or the keys stored in one namespace.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.router.store().as_ref(), params.0).await
    }
}

impl ServerHandler for ShellcacheHost {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shellcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(format!("Offline cache router for namespace {}.", self.router.namespace())),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
