//! n8n workflow adapter.

pub mod config;
pub mod tools;

use homelab_rest_tools::{ClientOptions, RestAdapter, RestClient, ServerIdentity};

pub use tools::N8nTool;

pub type N8nAdapter = RestAdapter<N8nTool>;

#[must_use]
pub fn identity() -> ServerIdentity {
    ServerIdentity {
        name: "n8n-mcp-server",
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// # Errors
///
/// Returns an error if the client cannot be built (e.g. invalid base URL).
pub fn build_adapter(options: ClientOptions) -> homelab_rest_tools::Result<N8nAdapter> {
    Ok(RestAdapter::new(identity(), RestClient::new(options)?))
}
