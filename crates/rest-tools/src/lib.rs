//! Shared runtime for the homelab MCP adapters.
//!
//! Each adapter crate declares a closed tool enum (catalog + request templates) and hands it to
//! this crate, which validates arguments, issues the single REST request, renders the result and
//! serves everything over MCP stdio.

pub mod args;
pub mod catalog;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod redact;
pub mod runtime;
pub mod semantics;
pub mod server;

pub use args::Arguments;
pub use cli::CommonArgs;
pub use catalog::{ParamSpec, ParamType, ToolDescriptor, ToolSet};
pub use dispatch::{RestAdapter, Route};
pub use error::{Result, ToolError};
pub use runtime::{ApiAuth, ClientOptions, RequestPlan, Rendering, RestClient};
pub use reqwest::Method;
pub use rmcp::model::{CallToolResult, Tool};
pub use server::{McpServer, ServerIdentity, ToolHandler};
