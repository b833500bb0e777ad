use crate::session::Credentials;
use clap::Parser;
use homelab_rest_tools::{ClientOptions, CommonArgs};

#[derive(Debug, Clone, Parser)]
#[command(name = "omada-mcp-server", version, about = "Omada controller tools over MCP stdio")]
pub struct Cli {
    /// Controller base URL.
    #[arg(long, env = "OMADA_URL", default_value = "https://localhost:8043")]
    pub url: String,

    #[arg(long, env = "OMADA_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "OMADA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Site name used in site-scoped paths.
    #[arg(long, env = "OMADA_SITE_ID", default_value = "Default")]
    pub site_id: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    /// Certificate checks are off and cookies set by the controller are kept.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new(self.url.clone());
        options.timeout = self.common.timeout();
        options.accept_invalid_certs = true;
        options.cookie_store = true;
        options
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_controller() {
        let cli = Cli::parse_from(["omada-mcp-server"]);
        assert_eq!(cli.url, "https://localhost:8043");
        assert_eq!(cli.site_id, "Default");
        assert!(!cli.has_credentials());

        let options = cli.client_options();
        assert!(options.accept_invalid_certs);
        assert!(options.cookie_store);
    }

    #[test]
    fn credentials_come_from_flags() {
        let cli = Cli::parse_from([
            "omada-mcp-server",
            "--username",
            "admin",
            "--password",
            "pw",
            "--site-id",
            "Lab",
        ]);
        assert!(cli.has_credentials());
        assert_eq!(cli.credentials().username, "admin");
        assert_eq!(cli.site_id, "Lab");
    }
}
