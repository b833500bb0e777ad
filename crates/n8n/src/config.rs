use clap::Parser;
use homelab_rest_tools::{ApiAuth, ClientOptions, CommonArgs};

/// Header n8n's public API reads the key from.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "n8n-mcp-server", version, about = "n8n workflow tools over MCP stdio")]
pub struct Cli {
    /// n8n API base URL; tool paths such as /workflows are appended to it.
    #[arg(long, env = "N8N_URL", default_value = "http://localhost:5678")]
    pub url: String,

    /// n8n API key.
    #[arg(long, env = "N8N_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new(self.url.clone());
        options.auth = api_key_auth(self.api_key.clone());
        options.timeout = self.common.timeout();
        options
    }
}

#[must_use]
pub fn api_key_auth(api_key: Option<String>) -> ApiAuth {
    api_key.map_or(ApiAuth::None, |value| ApiAuth::Header {
        name: API_KEY_HEADER.to_string(),
        value,
    })
}
