//! The `openshift-lightspeed` tool: descriptor, argument validation, and result rendering.
//!
//! Backend failures never escape as protocol errors. They are rendered as a successful tool
//! result whose only text item starts with `Error: `. The one exception is an unknown tool name,
//! which is a host/schema mismatch and is returned as [`GatewayError::UnknownTool`].

use crate::client::BackendClient;
use crate::error::GatewayError;
use crate::models::QueryRequest;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const TOOL_NAME: &str = "openshift-lightspeed";
pub const TOOL_DESCRIPTION: &str = "Query OpenShift LightSpeed for assistance with OpenShift, Kubernetes, and related technologies";

#[derive(Debug, Clone)]
pub struct ToolGateway {
    client: BackendClient,
}

impl ToolGateway {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// The single tool this server exposes.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tool = Tool::new(TOOL_NAME, TOOL_DESCRIPTION, Arc::new(input_schema()));
        tool.annotations = Some(query_annotations());
        vec![tool]
    }

    /// Handle a `tools/call`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownTool`] if `name` is not [`TOOL_NAME`]. Every other failure
    /// is returned as `Ok` with an `Error: ...` text item.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, GatewayError> {
        if name != TOOL_NAME {
            warn!(tool = %name, "call for unknown tool");
            return Err(GatewayError::UnknownTool(name.to_string()));
        }

        let text = match self.answer(arguments).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    GatewayError::Backend(be) => {
                        error!(kind = be.kind(), error = %be, "Error calling OpenShift LightSpeed");
                    }
                    other => warn!(error = %other, "rejected tool arguments"),
                }
                format!("Error: {e}")
            }
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    async fn answer(&self, arguments: Option<&JsonObject>) -> Result<String, GatewayError> {
        let request = parse_request(arguments)?;
        debug!(
            query_len = request.query.len(),
            conversation_id = request.conversation_id.as_deref(),
            "forwarding query to LightSpeed"
        );
        let response = self.client.query(&request).await?;
        Ok(response.response)
    }
}

fn input_schema() -> JsonObject {
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The question or query to send to OpenShift LightSpeed"
            },
            "conversation_id": {
                "type": "string",
                "description": "Optional conversation ID for maintaining context across queries"
            }
        },
        "required": ["query"]
    });
    schema.as_object().cloned().unwrap_or_else(JsonObject::new)
}

// The tool POSTs to an external service that may record conversation state.
fn query_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(false),
        destructive_hint: Some(false),
        idempotent_hint: Some(false),
        open_world_hint: Some(true),
    }
}

/// Build a [`QueryRequest`] from untyped tool arguments.
///
/// `query` must be a non-empty string. `conversation_id` is optional; null and empty strings are
/// treated as absent.
fn parse_request(arguments: Option<&JsonObject>) -> Result<QueryRequest, GatewayError> {
    let get = |key: &str| arguments.and_then(|args| args.get(key));

    let query = match get("query") {
        None | Some(Value::Null) => return Err(GatewayError::MissingArgument),
        Some(Value::String(s)) if s.is_empty() => return Err(GatewayError::MissingArgument),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(GatewayError::InvalidArgument("query")),
    };

    let conversation_id = match get("conversation_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(GatewayError::InvalidArgument("conversation_id")),
    };

    Ok(QueryRequest::new(query, conversation_id))
}
