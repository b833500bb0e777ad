use anyhow::Context as _;
use clap::Parser as _;
use homelab_mcp_n8n::build_adapter;
use homelab_mcp_n8n::config::Cli;
use homelab_rest_tools::server::serve_stdio;
use tracing::{error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging()?;

    if cli.api_key.is_none() {
        warn!("N8N_API_KEY is not set; the n8n API will reject most calls");
    }

    let adapter = build_adapter(cli.client_options()).context("configure n8n client")?;
    if let Err(e) = serve_stdio(adapter).await {
        error!(error = %e, "server error");
        return Err(e);
    }
    Ok(())
}
