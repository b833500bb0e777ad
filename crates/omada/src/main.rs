use anyhow::Context as _;
use clap::Parser as _;
use homelab_mcp_omada::build_adapter;
use homelab_mcp_omada::config::Cli;
use homelab_rest_tools::server::serve_stdio;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging()?;

    if !cli.has_credentials() {
        warn!("OMADA_USERNAME or OMADA_PASSWORD is not set; login will fail");
    }

    let adapter = build_adapter(cli.client_options(), cli.credentials(), cli.site_id.clone())
        .context("configure Omada client")?;
    if !adapter.login().await {
        info!("continuing without a session; login is retried on the next tool call");
    }

    if let Err(e) = serve_stdio(adapter).await {
        error!(error = %e, "server error");
        return Err(e);
    }
    Ok(())
}
