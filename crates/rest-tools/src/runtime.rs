//! Runtime for issuing one templated REST request per tool call.
//!
//! An adapter turns a tool call into a [`RequestPlan`]; [`RestClient`] builds the URL, applies
//! the adapter's auth, sends the request and renders the response into the text block that goes
//! back to the agent host.

use crate::error::{Result, ToolError};
use base64::Engine as _;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// How a successful response is turned into the tool's text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// Pretty-printed response body.
    Body,
    /// Pretty-printed value of one top-level field of the response envelope.
    Field(&'static str),
    /// Fixed confirmation text; the body is discarded.
    Confirmation(String),
}

impl Rendering {
    /// The tool's text output for a successful response `body`.
    #[must_use]
    pub fn render(&self, body: Value) -> String {
        match self {
            Self::Body => pretty(&body),
            Self::Field(field) => pretty(body.get(*field).unwrap_or(&Value::Null)),
            Self::Confirmation(message) => message.clone(),
        }
    }
}

/// One outbound request, fully derived from a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: Method,
    /// Raw (unencoded) path segments, appended to the base URL in order.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub rendering: Rendering,
}

impl RequestPlan {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            rendering: Rendering::Body,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, segments)
    }

    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Prepend segments (e.g. a controller id) in front of the existing path.
    #[must_use]
    pub fn under<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments: Vec<String> = prefix.into_iter().map(Into::into).collect();
        segments.append(&mut self.segments);
        self.segments = segments;
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a query pair only when the value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v.to_string()),
            None => self,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn render_field(mut self, field: &'static str) -> Self {
        self.rendering = Rendering::Field(field);
        self
    }

    #[must_use]
    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.rendering = Rendering::Confirmation(message.into());
        self
    }

    /// Percent-encoded path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(&encode_component(segment));
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }
}

/// Credentials attached to every request of a client.
#[derive(Debug, Clone, Default)]
pub enum ApiAuth {
    #[default]
    None,
    Bearer(String),
    Header {
        name: String,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub auth: ApiAuth,
    /// `None` disables the per-request timeout.
    pub timeout: Option<Duration>,
    /// Accept self-signed upstream certificates.
    pub accept_invalid_certs: bool,
    /// Keep cookies set by the upstream across requests.
    pub cookie_store: bool,
}

impl ClientOptions {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: ApiAuth::None,
            timeout: Some(Duration::from_secs(30)),
            accept_invalid_certs: false,
            cookie_store: false,
        }
    }
}

#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    base_url: String,
    auth: ApiAuth,
    timeout: Option<Duration>,
    client: Client,
}

impl RestClient {
    /// Build a client for one vendor API.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http(s)` URL or the underlying HTTP
    /// client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let parsed = Url::parse(&options.base_url)
            .map_err(|e| ToolError::Url(format!("invalid base URL '{}': {e}", options.base_url)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ToolError::Url(format!(
                "unsupported URL scheme '{}' in '{}'",
                parsed.scheme(),
                options.base_url
            )));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .cookie_store(options.cookie_store)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                base_url: options.base_url.trim_end_matches('/').to_string(),
                auth: options.auth,
                timeout: options.timeout,
                client,
            }),
        })
    }

    /// Send the planned request and return the decoded body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Status`] for non-2xx responses and [`ToolError::Transport`] when the
    /// request could not be completed.
    pub async fn send(&self, plan: &RequestPlan) -> Result<Value> {
        let url = self.url_for(plan)?;
        debug!(method = %plan.method, path = %plan.path(), "sending upstream request");

        let mut request = self.inner.client.request(plan.method.clone(), url);
        request = match &self.inner.auth {
            ApiAuth::None => request,
            ApiAuth::Bearer(token) => request.bearer_auth(token),
            ApiAuth::Header { name, value } => request.header(name, value),
        };
        for (name, value) in &plan.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &plan.body {
            request = request.json(body);
        }
        if let Some(t) = self.inner.timeout {
            request = request.timeout(t);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes, content_type.as_deref());

        debug!(status = status.as_u16(), "upstream responded");

        if status.is_success() {
            Ok(body)
        } else {
            Err(ToolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: body.to_string(),
            })
        }
    }

    /// Send the planned request and render the tool's text output.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::send`].
    pub async fn execute(&self, plan: &RequestPlan) -> Result<String> {
        let body = self.send(plan).await?;
        Ok(plan.rendering.render(body))
    }

    fn url_for(&self, plan: &RequestPlan) -> Result<Url> {
        build_url(&self.inner.base_url, &plan.path(), &plan.query)
    }
}


fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Decode a response body: JSON when it parses, otherwise a JSON string, and a base64
/// envelope for non-UTF-8 payloads.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Value {
    match std::str::from_utf8(bytes) {
        Ok(text) => serde_json::from_str(text).unwrap_or_else(|_| json!(text)),
        Err(_) => {
            let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
            json!({
                "encoding": "base64",
                "mimeType": content_type,
                "data": b64
            })
        }
    }
}

fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{base_url}{path}"))
        .map_err(|e| ToolError::Url(format!("{base_url}{path}: {e}")))?;

    if !query.is_empty() {
        let encoded = query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&encoded));
    }

    Ok(url)
}

fn encode_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
