//! Templates command: list the templates offered for selection.

use crate::cli::common::{print_json, CliResult};
use crate::config::Config;
use crate::services::TemplateService;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List available templates
#[derive(Debug, Clone, Args)]
pub struct TemplatesArgs {
    /// Templates directory (defaults to the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output of the templates command.
#[derive(Debug, Serialize)]
struct TemplateListResponse {
    directory: String,
    templates: Vec<String>,
    count: usize,
}

impl TemplatesArgs {
    /// Execute the templates command
    pub fn execute(&self) -> CliResult<()> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => Config::load().unwrap_or_default().templates_dir(),
        };

        let templates = TemplateService::list_template_files(&dir);

        if self.json {
            return print_json(&TemplateListResponse {
                directory: dir.display().to_string(),
                count: templates.len(),
                templates,
            });
        }

        if templates.is_empty() {
            println!("No templates found in {}", dir.display());
            return Ok(());
        }

        println!("Templates in {}:", dir.display());
        for name in &templates {
            println!("  {name}");
        }

        Ok(())
    }
}
