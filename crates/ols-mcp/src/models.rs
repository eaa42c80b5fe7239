//! Request/response values exchanged with the LightSpeed backend.

use crate::error::BackendError;
use serde::Serialize;
use serde_json::Value;

/// Placeholder used when the backend omits `response`.
pub const NO_RESPONSE: &str = "No response received";

/// A single question for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl QueryRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            query: query.into(),
            conversation_id,
        }
    }
}

/// The backend's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub conversation_id: Option<String>,
}

impl QueryResponse {
    /// Build a response from a decoded 2xx body.
    ///
    /// Missing fields fall back to [`NO_RESPONSE`] and the request's conversation id; a
    /// conversation id returned by the backend wins even if it differs from the request's.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unexpected`] if the body is not an object or a field has the
    /// wrong type.
    pub fn from_body(body: &Value, request: &QueryRequest) -> Result<Self, BackendError> {
        let Some(obj) = body.as_object() else {
            return Err(BackendError::Unexpected(format!(
                "expected a JSON object, got {}",
                json_type_name(body)
            )));
        };

        let response = match obj.get("response") {
            None => NO_RESPONSE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(BackendError::Unexpected(format!(
                    "field 'response' must be a string, got {}",
                    json_type_name(other)
                )));
            }
        };

        let conversation_id = match obj.get("conversation_id") {
            None => request.conversation_id.clone(),
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(BackendError::Unexpected(format!(
                    "field 'conversation_id' must be a string, got {}",
                    json_type_name(other)
                )));
            }
        };

        Ok(Self {
            response,
            conversation_id,
        })
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
