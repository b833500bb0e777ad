use clap::Parser;
use homelab_rest_tools::{ApiAuth, ClientOptions, CommonArgs};

#[derive(Debug, Clone, Parser)]
#[command(name = "homebox-mcp-server", version, about = "HomeBox inventory tools over MCP stdio")]
pub struct Cli {
    /// HomeBox base URL (the API lives under /api/v1).
    #[arg(long, env = "HOMEBOX_URL", default_value = "http://localhost:7745")]
    pub url: String,

    /// API token sent as a bearer token.
    #[arg(long, env = "HOMEBOX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new(api_root(&self.url));
        options.auth = self
            .token
            .clone()
            .map_or(ApiAuth::None, ApiAuth::Bearer);
        options.timeout = self.common.timeout();
        options
    }
}

/// `<base>/api/v1`, tolerating a trailing slash on the configured URL.
#[must_use]
pub fn api_root(base_url: &str) -> String {
    format!("{}/api/v1", base_url.trim_end_matches('/'))
}
