//! Error taxonomy for tool dispatch.
//!
//! None of these ever reach the protocol layer as a JSON-RPC error: the dispatcher turns every
//! variant into an `isError: true` tool result whose text is `Error: <display>`.

use crate::redact::sanitize_reqwest_error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool name is not part of the adapter's catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed validation against the declared parameters.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream answered with a non-2xx status.
    #[error("API returned {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The upstream answered 2xx but its envelope reports a failure.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Connection, TLS, timeout or body read failures.
    #[error("http transport error: {0}")]
    Transport(String),

    /// Login against the upstream did not yield a usable session.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request URL could not be built from the base URL and path.
    #[error("invalid URL: {0}")]
    Url(String),
}

impl ToolError {
    /// HTTP status of the upstream response, when the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
