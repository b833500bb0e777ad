//! Command-line / environment options every adapter binary shares.

use crate::logging::{self, LogFormat};
use clap::Args;
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Log level (overridden by RUST_LOG).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format: text or json (always written to stderr).
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Per-request upstream timeout in seconds; 0 disables it.
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl CommonArgs {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init_logging(&self) -> anyhow::Result<()> {
        logging::init(&self.log_level, self.log_format)
    }
}
