//! Inspect command: show how a template is turned into widgets.

use crate::cli::common::{load_generator, print_json, CliResult};
use crate::config::Config;
use crate::form::{FieldView, RecordingUi, WidgetState};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show the root key, field order and widget keys of a template
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to the YAML template
    #[arg(short, long, value_name = "FILE")]
    pub template: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output of the inspect command.
#[derive(Debug, Serialize)]
struct InspectResponse {
    root_key: Option<String>,
    key_order: Vec<String>,
    fields: Vec<FieldView>,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().unwrap_or_default();
        let mut generator = load_generator(&self.template, config.ui.expander_expanded)?;

        let widgets = WidgetState::new();
        let mut ui = RecordingUi::new(&widgets);
        generator.render_form(&mut ui);

        let (root_key, key_order) = generator
            .template()
            .map(|t| (t.root_key().map(str::to_string), t.key_order().to_vec()))
            .unwrap_or_default();

        let response = InspectResponse {
            root_key,
            key_order,
            fields: ui.finish(),
        };

        if self.json {
            return print_json(&response);
        }

        match &response.root_key {
            Some(root) => println!("Root key: {root}"),
            None => println!("Root key: (none)"),
        }
        println!("Fields:   {}", response.key_order.join(", "));
        println!();
        for view in &response.fields {
            print_view(view, 1);
        }

        Ok(())
    }
}

fn print_view(view: &FieldView, depth: usize) {
    let indent = "  ".repeat(depth);
    match view {
        FieldView::Text { key, label, value } => {
            println!("{indent}{key:<32} text      {label} = {value:?}");
        }
        FieldView::Checkbox { key, label, value } => {
            println!("{indent}{key:<32} checkbox  {label} = {value}");
        }
        FieldView::Number {
            key, label, value, ..
        } => {
            let shown = serde_json::to_string(value).unwrap_or_default();
            println!("{indent}{key:<32} number    {label} = {shown}");
        }
        FieldView::MultiSelect {
            key,
            label,
            options,
            selected,
        } => {
            println!(
                "{indent}{key:<32} select    {label} = [{}] of [{}]",
                selected.join(", "),
                options.join(", ")
            );
        }
        FieldView::Tabs { label, children } => {
            println!("{indent}[tabs] {label}");
            for child in children {
                print_view(child, depth + 1);
            }
        }
        FieldView::Tab { label, children } => {
            println!("{indent}[tab] {label}");
            for child in children {
                print_view(child, depth + 1);
            }
        }
        FieldView::Expander {
            label, children, ..
        } => {
            println!("{indent}[panel] {label}");
            for child in children {
                print_view(child, depth + 1);
            }
        }
    }
}
