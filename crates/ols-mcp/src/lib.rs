//! OpenShift LightSpeed exposed as a single MCP tool.
//!
//! - [`gateway`] owns the `openshift-lightspeed` tool and turns every outcome into text.
//! - [`client`] translates a query into `POST {base_url}/v1/query` and maps the reply.
//! - [`server`] plugs the gateway into rmcp and serves it over stdio.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod server;

pub use client::BackendClient;
pub use config::BackendConfig;
pub use error::{BackendError, ConfigError, GatewayError};
pub use gateway::{TOOL_NAME, ToolGateway};
pub use models::{QueryRequest, QueryResponse};
pub use server::LightspeedServer;
