//! CLI command handlers for yamlform.
//!
//! This module provides headless, scriptable access to the form generator:
//! listing templates, inspecting widget keys, validating and exporting.

pub mod common;
pub mod export;
pub mod inspect;
#[cfg(feature = "web")]
pub mod serve;
pub mod templates;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use export::ExportArgs;
pub use inspect::InspectArgs;
#[cfg(feature = "web")]
pub use serve::ServeArgs;
pub use templates::TemplatesArgs;
pub use validate::ValidateArgs;
