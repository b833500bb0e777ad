//! Test helpers shared by the adapter crates.
//!
//! - [`MockUpstream`]: an in-process HTTP server that records every request and answers with
//!   configurable JSON responses, standing in for the vendor APIs.
//! - [`StdioSession`]: drives a built adapter binary as an MCP client.

use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::any;
use parking_lot::Mutex;
use rmcp::ServiceExt as _;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ClientInfo, Implementation, InitializeResult,
    ProtocolVersion, Tool,
};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::{ConfigureCommandExt as _, TokioChildProcess};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::process::Command;
use tokio::sync::oneshot;

pub use rmcp::model::ProtocolVersion as McpProtocolVersion;

const TIMEOUT: Duration = Duration::from_secs(10);

/// One request as seen by [`MockUpstream`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Decoded query pairs, in order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query.as_deref().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// `path?query` as received.
    #[must_use]
    pub fn target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

type RouteKey = (String, String);

#[derive(Default)]
struct Script {
    requests: Vec<RecordedRequest>,
    once: HashMap<RouteKey, VecDeque<(u16, Value)>>,
    sticky: HashMap<RouteKey, (u16, Value)>,
    fallback: Option<(u16, Value)>,
}

impl Script {
    fn response_for(&mut self, key: &RouteKey) -> (u16, Value) {
        if let Some(resp) = self.once.get_mut(key).and_then(VecDeque::pop_front) {
            return resp;
        }
        if let Some(resp) = self.sticky.get(key) {
            return resp.clone();
        }
        self.fallback.clone().unwrap_or_else(|| (200, json!({})))
    }
}

/// Recording stand-in for a vendor REST API.
pub struct MockUpstream {
    base_url: String,
    script: Arc<Mutex<Script>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    /// Bind an ephemeral localhost port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> anyhow::Result<Self> {
        let script = Arc::new(Mutex::new(Script::default()));
        let app = Router::new()
            .route("/", any(record))
            .route("/{*path}", any(record))
            .with_state(script.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock upstream")?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            script,
            shutdown: Some(shutdown_tx),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer every unscripted request with `status` and `body`.
    pub fn respond_json(&self, status: u16, body: Value) {
        self.script.lock().fallback = Some((status, body));
    }

    /// Answer every `method path` request with `status` and `body`.
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script
            .lock()
            .sticky
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    /// Answer the next `method path` request with `status` and `body`; queued responses are
    /// consumed in order before any sticky response.
    pub fn on_once(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script
            .lock()
            .once
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body));
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    /// Requests whose path equals `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn record(
    State(script): State<Arc<Mutex<Script>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let recorded = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };

    let key = (recorded.method.clone(), recorded.path.clone());
    let (status, body) = {
        let mut script = script.lock();
        script.requests.push(recorded);
        script.response_for(&key)
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(body))
}

/// A spawned adapter process driven by an `rmcp` client over its stdio.
pub struct StdioSession {
    client: RunningService<RoleClient, ClientInfo>,
}

impl StdioSession {
    /// Spawn `bin` with a clean environment plus `envs` and complete the `initialize` handshake.
    /// Stderr is inherited for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or the handshake fails.
    pub async fn spawn(bin: &str, envs: &[(&str, &str)]) -> anyhow::Result<Self> {
        Self::spawn_with_version(bin, envs, ProtocolVersion::V_2024_11_05).await
    }

    /// Like [`StdioSession::spawn`], requesting `version` in `initialize`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or the handshake fails.
    pub async fn spawn_with_version(
        bin: &str,
        envs: &[(&str, &str)],
        version: ProtocolVersion,
    ) -> anyhow::Result<Self> {
        let transport = TokioChildProcess::new(adapter_command(bin, envs))
            .with_context(|| format!("spawn {bin}"))?;
        let info = ClientInfo {
            protocol_version: version,
            client_info: Implementation {
                name: "homelab-mcp-tests".to_string(),
                version: "0".to_string(),
                ..Implementation::default()
            },
            ..ClientInfo::default()
        };
        let client = tokio::time::timeout(TIMEOUT, info.serve(transport))
            .await
            .context("timeout waiting for initialize")??;
        Ok(Self { client })
    }

    /// The server's `initialize` result.
    #[must_use]
    pub fn server_info(&self) -> Option<&InitializeResult> {
        self.client.peer_info()
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or times out.
    pub async fn list_tools(&self) -> anyhow::Result<Vec<Tool>> {
        let tools = tokio::time::timeout(TIMEOUT, self.client.list_all_tools())
            .await
            .context("timeout waiting for tools/list")??;
        Ok(tools)
    }

    /// Call `name` with `arguments` (a JSON object, or `null` for none).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or times out.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> anyhow::Result<CallToolResult> {
        let params = CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };
        let result = tokio::time::timeout(TIMEOUT, self.client.call_tool(params))
            .await
            .context("timeout waiting for tools/call")??;
        Ok(result)
    }

    /// Close the session; the child is killed once the transport drops.
    ///
    /// # Errors
    ///
    /// Returns an error if the client task panicked.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.client.cancel().await?;
        Ok(())
    }
}

/// Run `bin` with a clean environment plus `envs` and closed stdin, and wait for it to exit.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or runs longer than the test timeout.
pub async fn run_to_exit(bin: &str, envs: &[(&str, &str)]) -> anyhow::Result<ExitStatus> {
    let mut child = adapter_command(bin, envs)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {bin}"))?;
    let status = tokio::time::timeout(TIMEOUT, child.wait())
        .await
        .context("timeout waiting for exit")??;
    Ok(status)
}

fn adapter_command(bin: &str, envs: &[(&str, &str)]) -> Command {
    Command::new(bin).configure(|cmd| {
        cmd.env_clear()
            .envs(envs.iter().copied())
            .env("LOG_LEVEL", "debug")
            .kill_on_drop(true);
    })
}

/// Text of the first content block of a tool result.
#[must_use]
pub fn tool_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
}

/// `isError` of a tool result (absent counts as `false`).
#[must_use]
pub fn tool_is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
