//! HomeBox inventory adapter.

pub mod config;
pub mod tools;

use homelab_rest_tools::{ClientOptions, RestAdapter, RestClient, ServerIdentity};

pub use tools::HomeboxTool;

pub type HomeboxAdapter = RestAdapter<HomeboxTool>;

#[must_use]
pub fn identity() -> ServerIdentity {
    ServerIdentity {
        name: "homebox-mcp-server",
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// Build the adapter against an API root such as `http://localhost:7745/api/v1`.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g. invalid base URL).
pub fn build_adapter(options: ClientOptions) -> homelab_rest_tools::Result<HomeboxAdapter> {
    Ok(RestAdapter::new(identity(), RestClient::new(options)?))
}
