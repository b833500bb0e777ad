//! Omada network controller adapter.
//!
//! Unlike the other adapters this one holds state: the token and controller id obtained by
//! logging in. The session is refreshed when missing and after a 401.

pub mod config;
pub mod envelope;
pub mod session;
pub mod tools;

use async_trait::async_trait;
use homelab_rest_tools::catalog::list_tools;
use homelab_rest_tools::dispatch::{resolve, to_call_result};
use homelab_rest_tools::{
    Arguments, CallToolResult, ClientOptions, RestClient, Result, Route, ServerIdentity, Tool,
    ToolHandler,
};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub use session::{CSRF_HEADER, Credentials, OmadaSession};
pub use tools::{OmadaTool, SiteScope};

#[must_use]
pub fn identity() -> ServerIdentity {
    ServerIdentity {
        name: "omada-mcp-server",
        version: env!("CARGO_PKG_VERSION"),
    }
}

pub struct OmadaAdapter {
    client: RestClient,
    credentials: Credentials,
    site_id: String,
    // Held for a whole call, so login, send and retry never interleave.
    session: Mutex<OmadaSession>,
}

impl OmadaAdapter {
    #[must_use]
    pub fn new(
        client: RestClient,
        credentials: Credentials,
        site_id: impl Into<String>,
        session: OmadaSession,
    ) -> Self {
        Self {
            client,
            credentials,
            site_id: site_id.into(),
            session: Mutex::new(session),
        }
    }

    /// A snapshot of the current session.
    pub async fn session(&self) -> OmadaSession {
        self.session.lock().await.clone()
    }

    pub async fn login(&self) -> bool {
        let mut session = self.session.lock().await;
        session.login(&self.client, &self.credentials).await
    }

    /// Run one tool call: log in if needed, send, and on a 401 log in again and retry once.
    ///
    /// # Errors
    ///
    /// Returns any [`homelab_rest_tools::ToolError`]; unknown names and invalid arguments fail
    /// before any request, including login. A 2xx reply whose envelope carries a non-zero
    /// `errorCode` fails with [`homelab_rest_tools::ToolError::Api`].
    pub async fn dispatch(&self, name: &str, raw: Map<String, Value>) -> Result<String> {
        let (tool, args) = resolve::<OmadaTool>(name, raw)?;

        let mut session = self.session.lock().await;
        if !session.is_authenticated() {
            session.login(&self.client, &self.credentials).await;
        }

        match self.send(&session, tool, &args).await {
            Err(e) if e.is_unauthorized() => {
                warn!(tool = %name, "controller rejected the session, logging in again");
                if session.login(&self.client, &self.credentials).await {
                    self.send(&session, tool, &args).await
                } else {
                    Err(e)
                }
            }
            outcome => outcome,
        }
    }

    async fn send(
        &self,
        session: &OmadaSession,
        tool: OmadaTool,
        args: &Arguments,
    ) -> Result<String> {
        let scope = SiteScope {
            controller_id: session.controller_id().map(str::to_string),
            site_id: self.site_id.clone(),
        };
        let mut plan = tool.plan(args, &scope)?;
        if let Some(token) = session.token() {
            plan = plan.header(CSRF_HEADER, token);
        }
        let body = self.client.send(&plan).await?;
        envelope::check(&body)?;
        Ok(plan.rendering.render(body))
    }
}

#[async_trait]
impl ToolHandler for OmadaAdapter {
    fn identity(&self) -> ServerIdentity {
        identity()
    }

    fn list_tools(&self) -> Vec<Tool> {
        list_tools::<OmadaTool>()
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

/// Build an adapter with an empty session.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g. invalid base URL).
pub fn build_adapter(
    options: ClientOptions,
    credentials: Credentials,
    site_id: impl Into<String>,
) -> Result<OmadaAdapter> {
    Ok(OmadaAdapter::new(
        RestClient::new(options)?,
        credentials,
        site_id,
        OmadaSession::new(),
    ))
}
