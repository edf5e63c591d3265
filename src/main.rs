//! Dynamic YAML Form Generator - edit YAML templates as forms
//!
//! Serves a browser form for any YAML template and offers headless commands
//! to inspect, validate and export templates.
//!
//! # Usage
//!
//! ```bash
//! # Start the web form on the configured host and port (127.0.0.1:8501)
//! yamlform serve
//!
//! # Export a template with two edited fields
//! yamlform export -t app.yaml --set field_name=demo --set bool_debug=false
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yamlform::cli::{self, CliResult};

/// Dynamic YAML Form Generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web form
    #[cfg(feature = "web")]
    Serve(cli::ServeArgs),
    /// List available templates
    Templates(cli::TemplatesArgs),
    /// Show the widgets generated for a template
    Inspect(cli::InspectArgs),
    /// Validate the YAML export of a template
    Validate(cli::ValidateArgs),
    /// Export a filled-in template as YAML or CSV
    Export(cli::ExportArgs),
}

fn run(command: &Command) -> CliResult<()> {
    match command {
        #[cfg(feature = "web")]
        Command::Serve(args) => args.execute(),
        Command::Templates(args) => args.execute(),
        Command::Inspect(args) => args.execute(),
        Command::Validate(args) => args.execute(),
        Command::Export(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "warn,yamlform=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code.code());
    }
}
