//! Tool-call dispatch: name → tool variant → validated arguments → request plan → text result.

use crate::args::Arguments;
use crate::catalog::{ToolSet, list_tools};
use crate::error::{Result, ToolError};
use crate::runtime::{RequestPlan, RestClient};
use crate::server::{ServerIdentity, ToolHandler};
use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use tracing::{info, warn};

/// A tool set whose variants each map to one request template.
pub trait Route: ToolSet {
    /// Per-call context the templates need (e.g. a controller id); `()` when none.
    type Scope;

    /// Build the outbound request for this tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] if an argument the template needs is unusable.
    fn plan(self, args: &Arguments, scope: &Self::Scope) -> Result<RequestPlan>;
}

/// Look up `name` in `T` and validate `raw` against its declared params.
///
/// # Errors
///
/// Returns [`ToolError::UnknownTool`] or [`ToolError::InvalidArguments`].
pub fn resolve<T: ToolSet>(name: &str, raw: Map<String, Value>) -> Result<(T, Arguments)> {
    let tool = T::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
    let args = Arguments::validated(tool.descriptor(), raw)?;
    Ok((tool, args))
}

/// Convert a dispatch outcome into the single-text-block MCP result.
#[must_use]
pub fn to_call_result(outcome: Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Error: {e}"))]),
    }
}

/// Stateless adapter: every call is exactly one request through a preconfigured client.
pub struct RestAdapter<T> {
    identity: ServerIdentity,
    client: RestClient,
    _tools: PhantomData<fn() -> T>,
}

impl<T> RestAdapter<T>
where
    T: Route<Scope = ()>,
{
    #[must_use]
    pub fn new(identity: ServerIdentity, client: RestClient) -> Self {
        Self {
            identity,
            client,
            _tools: PhantomData,
        }
    }

    /// Run one tool call and return its text output.
    ///
    /// # Errors
    ///
    /// Returns any [`ToolError`]; unknown names and invalid arguments fail before any request.
    pub async fn dispatch(&self, name: &str, raw: Map<String, Value>) -> Result<String> {
        let (tool, args) = resolve::<T>(name, raw)?;
        let plan = tool.plan(&args, &())?;
        self.client.execute(&plan).await
    }
}

#[async_trait]
impl<T> ToolHandler for RestAdapter<T>
where
    T: Route<Scope = ()>,
{
    fn identity(&self) -> ServerIdentity {
        self.identity.clone()
    }

    fn list_tools(&self) -> Vec<Tool> {
        list_tools::<T>()
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> CallToolResult {
        let outcome = self.dispatch(name, arguments).await;
        match &outcome {
            Ok(_) => info!(tool = %name, "tool call succeeded"),
            Err(e) => warn!(tool = %name, error = %e, "tool call failed"),
        }
        to_call_result(outcome)
    }
}
