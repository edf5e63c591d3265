//! Validation command: check that a template exports to well-formed YAML.

use crate::cli::common::{load_generator, print_json, CliError, CliResult};
use crate::config::Config;
use crate::export;
use crate::form::{RecordingUi, WidgetState};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Validate the YAML export of a template's default form
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to the YAML template
    #[arg(short, long, value_name = "FILE")]
    pub template: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output of the validate command.
#[derive(Debug, Serialize)]
struct ValidateResponse {
    valid: bool,
    message: String,
    fields: usize,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().unwrap_or_default();
        let mut generator = load_generator(&self.template, config.ui.expander_expanded)?;

        let widgets = WidgetState::new();
        let mut ui = RecordingUi::new(&widgets);
        let fields = generator.render_form(&mut ui).len();

        let (valid, message) =
            export::validate_yaml(&generator.get_structured_data()).into_parts();

        if self.json {
            print_json(&ValidateResponse {
                valid,
                message: message.clone(),
                fields,
            })?;
        } else if valid {
            println!("✓ {message}");
            println!("  Fields: {fields}");
        } else {
            println!("✗ {message}");
        }

        if valid {
            Ok(())
        } else {
            Err(CliError::validation(message))
        }
    }
}
