//! Controller login and the in-memory session it produces.

use crate::envelope;
use homelab_rest_tools::{RequestPlan, RestClient, Result, ToolError};
use serde_json::{Value, json};
use std::fmt;
use tracing::{info, warn};

/// Header the controller expects the login token in.
pub const CSRF_HEADER: &str = "Csrf-Token";

#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token and controller id of the current login. Starts empty; only a complete login sequence
/// writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OmadaSession {
    token: Option<String>,
    controller_id: Option<String>,
}

impl OmadaSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that is already logged in.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, controller_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            controller_id: Some(controller_id.into()),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn controller_id(&self) -> Option<&str> {
        self.controller_id.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Run the login sequence. Failures are logged and leave the session unchanged.
    pub async fn login(&mut self, client: &RestClient, credentials: &Credentials) -> bool {
        match fetch_session(client, credentials).await {
            Ok((token, controller_id)) => {
                info!(controller_id = %controller_id, "logged in to Omada controller");
                self.token = Some(token);
                self.controller_id = Some(controller_id);
                true
            }
            Err(e) => {
                warn!(error = %e, "Omada login failed");
                false
            }
        }
    }
}

async fn fetch_session(client: &RestClient, credentials: &Credentials) -> Result<(String, String)> {
    let login = RequestPlan::post(["api", "v2", "login"]).json(json!({
        "username": credentials.username,
        "password": credentials.password,
    }));
    let token = result_str(&client.send(&login).await?, "token")?;

    let info = RequestPlan::get(["api", "v2", "info"]).header(CSRF_HEADER, token.as_str());
    let controller_id = result_str(&client.send(&info).await?, "omadacId")?;

    Ok((token, controller_id))
}

fn result_str(body: &Value, field: &str) -> Result<String> {
    envelope::check(body)?;
    body.get("result")
        .and_then(|r| r.get(field))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::Auth(format!("response has no result.{field}")))
}
