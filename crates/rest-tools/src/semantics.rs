//! MCP tool annotations derived from the HTTP verb a tool is bound to.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Build annotations for a tool that issues `method` against a vendor API.
///
/// Every tool touches an external system, so `openWorldHint` is always set. PATCH idempotence
/// depends on the payload and is left unset.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    // (read_only, destructive, idempotent)
    let (read_only, destructive, idempotent) = match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => (Some(true), Some(false), Some(true)),
        Method::POST => (Some(false), Some(false), Some(false)),
        Method::PUT | Method::DELETE => (Some(false), Some(true), Some(true)),
        Method::PATCH => (Some(false), Some(true), None),
        _ => (None, None, None),
    };

    ToolAnnotations {
        title: None,
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}
