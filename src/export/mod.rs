//! Export of form data.
//!
//! This module serializes the structured form data to YAML (with cosmetic
//! quote cleanup) and to flattened `key_path,value` CSV, and re-validates
//! exported YAML.

pub mod csv;
pub mod yaml;

pub use csv::{export_csv, flatten_data, quote_if_needed};
pub use yaml::{clean_yaml_quotes, export_yaml, validate_yaml, YamlValidation};
