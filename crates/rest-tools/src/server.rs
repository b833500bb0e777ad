//! MCP server glue.
//!
//! Adapters implement [`ToolHandler`]; [`McpServer`] wraps one as an `rmcp` [`ServerHandler`] so
//! the protocol (framing, `initialize`, `ping`, JSON-RPC errors) is handled by `rmcp`.
//! Logs go to stderr, never stdout.

use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, InitializeRequestParams,
    InitializeResult, ListToolsResult, PaginatedRequestParams, ProtocolVersion,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::transport::IntoTransport;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt as _};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Oldest protocol revision the adapters speak. Newer requests are answered with
/// [`ProtocolVersion::LATEST`].
pub const MIN_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V_2024_11_05;

/// Name and version reported in the `initialize` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: &'static str,
    pub version: &'static str,
}

/// What an adapter must provide to be served.
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    fn identity(&self) -> ServerIdentity;

    /// The static catalog, in declaration order.
    fn list_tools(&self) -> Vec<Tool>;

    /// Run one tool. Failures are reported inside the result (`isError`), never as `Err`.
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> CallToolResult;
}

/// An adapter exposed as an MCP server.
pub struct McpServer<H> {
    handler: H,
}

impl<H: ToolHandler> McpServer<H> {
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H: ToolHandler> ServerHandler for McpServer<H> {
    fn get_info(&self) -> ServerInfo {
        let identity = self.handler.identity();
        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: identity.name.to_string(),
                version: identity.version.to_string(),
                ..Implementation::default()
            },
            instructions: None,
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        if request.protocol_version < MIN_PROTOCOL_VERSION {
            warn!(requested = %request.protocol_version, "unsupported protocol version");
            return Err(McpError::invalid_params(
                format!(
                    "unsupported protocol version {}; supported: {} to {}",
                    request.protocol_version,
                    MIN_PROTOCOL_VERSION,
                    ProtocolVersion::LATEST
                ),
                None,
            ));
        }
        debug!(
            client = %request.client_info.name,
            version = %request.protocol_version,
            "initialize"
        );
        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.handler.list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tools/call");
        let arguments = request.arguments.unwrap_or_default();
        Ok(self.handler.call_tool(&request.name, arguments).await)
    }
}

/// Serve `handler` on the process's stdin/stdout until the client disconnects.
///
/// # Errors
///
/// Returns an error if the `initialize` handshake fails or the service task panics.
pub async fn serve_stdio<H: ToolHandler>(handler: H) -> anyhow::Result<()> {
    info!(server = handler.identity().name, "MCP server running on stdio");
    serve(handler, rmcp::transport::stdio()).await
}

/// Serve `handler` on any `rmcp` transport (a byte stream pair, a duplex pipe, ...).
///
/// # Errors
///
/// Returns an error if the `initialize` handshake fails or the service task panics.
pub async fn serve<H, T, E, A>(handler: H, transport: T) -> anyhow::Result<()>
where
    H: ToolHandler,
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
{
    let running = McpServer::new(handler).serve(transport).await?;
    let reason = running.waiting().await?;
    debug!(?reason, "MCP session closed");
    Ok(())
}
