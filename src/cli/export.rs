//! Export command: fill a template from the command line and write YAML or CSV.

use crate::cli::common::{load_generator, CliError, CliResult};
use crate::config::Config;
use crate::constants::{
    APP_BINARY_NAME, BOOL_PREFIX, CAT_PREFIX, FIELD_PREFIX, MULTI_PREFIX, NUM_PREFIX,
};
use crate::export;
use crate::form::{RecordingUi, WidgetState, WidgetValue};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Output format of the export command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// YAML document in template key order
    Yaml,
    /// `key_path,value` rows
    Csv,
}

/// Export a filled-in template as YAML or CSV
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Path to the YAML template
    #[arg(short, long, value_name = "FILE")]
    pub template: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Widget value as WIDGET_KEY=VALUE, e.g. field_name=demo or multi_tags=a,b
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().unwrap_or_default();
        let mut generator = load_generator(&self.template, config.ui.expander_expanded)?;

        let mut widgets = WidgetState::new();
        for assignment in &self.set {
            let (key, value) = parse_widget_assignment(assignment)?;
            widgets.set(key, value);
        }

        let mut ui = RecordingUi::new(&widgets);
        generator.render_form(&mut ui);
        let data = generator.get_structured_data();

        let content = match self.format {
            ExportFormat::Yaml => export::export_yaml(&data),
            ExportFormat::Csv => export::export_csv(&data),
        };

        match &self.output {
            Some(path) => {
                fs::write(path, &content).map_err(|e| {
                    CliError::io(format!("Failed to write {}: {e}", path.display()))
                })?;
                println!("✓ Exported to {}", path.display());
            }
            None => println!("{content}"),
        }

        Ok(())
    }
}

/// Parses `KEY=VALUE` into a widget value typed by the key's prefix.
///
/// Multi-select and category values are comma separated; an empty value
/// selects nothing.
pub fn parse_widget_assignment(assignment: &str) -> CliResult<(String, WidgetValue)> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| {
        CliError::validation(format!("Expected WIDGET_KEY=VALUE, got '{assignment}'"))
    })?;

    let value = if key.starts_with(BOOL_PREFIX) {
        let flag = raw.parse::<bool>().map_err(|_| {
            CliError::validation(format!("'{key}' expects true or false, got '{raw}'"))
        })?;
        WidgetValue::Flag(flag)
    } else if key.starts_with(NUM_PREFIX) {
        if let Ok(i) = raw.parse::<i64>() {
            WidgetValue::Integer(i)
        } else if let Ok(u) = raw.parse::<u64>() {
            WidgetValue::Unsigned(u)
        } else {
            let f = raw.parse::<f64>().map_err(|_| {
                CliError::validation(format!("'{key}' expects a number, got '{raw}'"))
            })?;
            WidgetValue::Float(f)
        }
    } else if key.starts_with(MULTI_PREFIX) || key.starts_with(CAT_PREFIX) {
        let selection = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        WidgetValue::Selection(selection)
    } else if key.starts_with(FIELD_PREFIX) {
        WidgetValue::Text(raw.to_string())
    } else {
        return Err(CliError::validation(format!(
            "Unknown widget key '{key}'; run `{APP_BINARY_NAME} inspect` to list widget keys"
        )));
    };

    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_widget_assignment_by_prefix() {
        assert_eq!(
            parse_widget_assignment("field_name=My App").unwrap(),
            ("field_name".to_string(), WidgetValue::Text("My App".to_string()))
        );
        assert_eq!(
            parse_widget_assignment("bool_debug=false").unwrap().1,
            WidgetValue::Flag(false)
        );
        assert_eq!(
            parse_widget_assignment("num_port=9000").unwrap().1,
            WidgetValue::Integer(9000)
        );
        assert_eq!(
            parse_widget_assignment("num_id=18446744073709551615").unwrap().1,
            WidgetValue::Unsigned(u64::MAX)
        );
        assert_eq!(
            parse_widget_assignment("num_ratio=0.5").unwrap().1,
            WidgetValue::Float(0.5)
        );
        assert_eq!(
            parse_widget_assignment("multi_tags=a, b").unwrap().1,
            WidgetValue::Selection(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            parse_widget_assignment("cat_langs_compiled=").unwrap().1,
            WidgetValue::Selection(Vec::new())
        );
    }

    #[test]
    fn test_parse_widget_assignment_keeps_equals_in_value() {
        assert_eq!(
            parse_widget_assignment("field_query=a=b").unwrap().1,
            WidgetValue::Text("a=b".to_string())
        );
    }

    #[test]
    fn test_parse_widget_assignment_errors() {
        assert!(parse_widget_assignment("field_name").is_err());
        assert!(parse_widget_assignment("bool_debug=maybe").is_err());
        assert!(parse_widget_assignment("num_port=lots").is_err());
        assert!(parse_widget_assignment("name=x").is_err());
    }
}
