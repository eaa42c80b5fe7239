//! MCP server surface: wires the [`ToolGateway`] into rmcp's `ServerHandler`.

use crate::error::GatewayError;
use crate::gateway::ToolGateway;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ServerHandler, ServiceExt as _};
use tracing::{debug, info};

pub const SERVER_NAME: &str = "openshift-lightspeed-mcp";

/// The process-wide MCP server. Owns the gateway; cloned per session by rmcp.
#[derive(Debug, Clone)]
pub struct LightspeedServer {
    gateway: ToolGateway,
}

impl LightspeedServer {
    #[must_use]
    pub fn new(gateway: ToolGateway) -> Self {
        Self { gateway }
    }

    /// Serve MCP over this process's stdin/stdout until the host closes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP initialize handshake fails or the service task fails.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(rmcp::transport::stdio()).await?;
        info!("MCP session initialized over stdio");
        let reason = service.waiting().await?;
        info!(?reason, "MCP session closed");
        Ok(())
    }
}

impl ServerHandler for LightspeedServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Use the openshift-lightspeed tool to ask OpenShift LightSpeed questions about \
                 OpenShift, Kubernetes, and related technologies. Pass the returned \
                 conversation context back via conversation_id to continue a conversation."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self.gateway.list_tools();
        debug!(count = tools.len(), "tools/list");
        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = %request.name, "tools/call");
        self.gateway
            .call_tool(&request.name, request.arguments.as_ref())
            .await
            .map_err(into_error_data)
    }
}

fn into_error_data(e: GatewayError) -> ErrorData {
    match e {
        GatewayError::UnknownTool(_) => ErrorData::invalid_params(e.to_string(), None),
        other => ErrorData::internal_error(other.to_string(), None),
    }
}
