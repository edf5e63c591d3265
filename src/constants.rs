//! Application-wide constants.
//!
//! This module defines the user-facing strings, export settings and widget
//! key prefixes shared by the form renderer, the web shell and the CLI.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Dynamic YAML Form Generator";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "yamlform";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "yamlform";

/// Sentinel returned by the YAML exporter when there is nothing to export.
pub const NO_DATA_TEXT: &str = "No data";

/// Message shown when an uploaded template was loaded.
pub const SUCCESS_MESSAGE: &str = "Template loaded successfully";

/// Message shown when no template has been loaded yet.
pub const LOAD_TEMPLATE_INFO: &str = "Load a YAML template to start";

/// File extensions accepted for templates (lowercase, without dot).
pub const ALLOWED_FILE_TYPES: [&str; 2] = ["yaml", "yml"];

/// YAML download filename.
pub const YAML_EXPORT_FILENAME: &str = "config.yaml";
/// YAML download MIME type.
pub const YAML_EXPORT_MIME: &str = "text/yaml";
/// CSV download filename.
pub const CSV_EXPORT_FILENAME: &str = "config.csv";
/// CSV download MIME type.
pub const CSV_EXPORT_MIME: &str = "text/csv";

/// CSV header row.
pub const CSV_HEADER: [&str; 2] = ["key_path", "value"];

// Widget key prefixes, one per widget kind.
/// Text input widget key prefix.
pub const FIELD_PREFIX: &str = "field_";
/// Checkbox widget key prefix.
pub const BOOL_PREFIX: &str = "bool_";
/// Number input widget key prefix.
pub const NUM_PREFIX: &str = "num_";
/// Multi-select widget key prefix.
pub const MULTI_PREFIX: &str = "multi_";
/// Category tab multi-select widget key prefix.
pub const CAT_PREFIX: &str = "cat_";

/// Every widget key prefix, used when clearing widget state.
pub const WIDGET_PREFIXES: [&str; 5] = [
    FIELD_PREFIX,
    BOOL_PREFIX,
    NUM_PREFIX,
    MULTI_PREFIX,
    CAT_PREFIX,
];
