use anyhow::Context as _;
use clap::Parser as _;
use homelab_mcp_homebox::build_adapter;
use homelab_mcp_homebox::config::Cli;
use homelab_rest_tools::server::serve_stdio;
use tracing::{error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging()?;

    if cli.token.is_none() {
        warn!("HOMEBOX_TOKEN is not set; requests will be sent without authorization");
    }

    let adapter = build_adapter(cli.client_options()).context("configure HomeBox client")?;
    if let Err(e) = serve_stdio(adapter).await {
        error!(error = %e, "server error");
        return Err(e);
    }
    Ok(())
}
