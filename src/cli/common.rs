//! Shared CLI plumbing: error type, exit codes and template loading.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::form::FormGenerator;
use crate::parser::parse_template;

/// Process exit codes used by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Input was read but is not acceptable
    ValidationError = 1,
    /// Input could not be read, parsed or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands, carrying its exit code.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Human readable message
    pub message: String,
    /// Exit code to terminate with
    pub exit_code: ExitCode,
}

impl CliError {
    /// An I/O or parse failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::IoError,
        }
    }

    /// A validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::ValidationError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Reads a template file and loads it into a fresh generator.
pub fn load_generator(path: &Path, expanded: bool) -> CliResult<FormGenerator> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("Failed to read template {}: {e}", path.display())))?;

    let template = parse_template(&content)
        .map_err(|e| CliError::io(format!("Failed to parse template {}: {e:#}", path.display())))?;

    let generator = FormGenerator::new()
        .with_expanded_panels(expanded)
        .with_template(template);
    Ok(generator)
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
