//! Serve command: run the browser form.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::web;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Start the web server
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Host to bind to (defaults to the configured one)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to the configured one)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Templates directory (defaults to the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl ServeArgs {
    /// Execute the serve command
    pub fn execute(&self) -> CliResult<()> {
        let mut config = Config::load()
            .map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))?;

        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.templates {
            config.paths.templates_dir = Some(dir.clone());
        }
        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e}")))?;

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| CliError::validation(format!("Invalid listen address: {e}")))?;
        let templates_dir = config.templates_dir();

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| CliError::io(format!("Failed to start async runtime: {e}")))?;

        runtime
            .block_on(web::run_server(config, templates_dir, addr))
            .map_err(|e| CliError::io(format!("Server error: {e:#}")))
    }
}
