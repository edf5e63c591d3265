//! YAML template parser.
//!
//! Parses template text, checks that the document root is a mapping and
//! detects the single-root-wrapper layout:
//!
//! ```yaml
//! Project:          # root key (cosmetic wrapper)
//!   name: Demo      # working data starts here
//!   version: 1
//! ```

use anyhow::{bail, Context, Result};
use serde_yml::{Mapping, Value};
use tracing::warn;

use crate::models::field::display_scalar;
use crate::models::Template;

/// Parses YAML template text into a [`Template`].
///
/// If the document has exactly one key and that key's value is itself a
/// mapping, the key is recorded as the root key and the inner mapping
/// becomes the working data. Otherwise the whole document is the working
/// data.
///
/// # Errors
///
/// Returns errors for:
/// - YAML syntax errors
/// - Documents whose root is not a mapping
pub fn parse_template(content: &str) -> Result<Template> {
    let document: Value = serde_yml::from_str(content).context("Failed to parse YAML template")?;

    let Value::Mapping(document) = normalize_keys(document) else {
        bail!("Template root must be a mapping of keys to values");
    };

    if document.len() == 1 {
        if let Some((Value::String(root), Value::Mapping(project))) = document.iter().next() {
            return Ok(Template::new(Some(root.clone()), project.clone()));
        }
    }

    Ok(Template::new(None, document))
}

/// Recursively converts every mapping key to a string key.
///
/// Non-string scalar keys (`1: x`, `true: y`) keep their YAML spelling.
/// When two keys share a spelling (`1` and `'1'`) the later value wins and
/// takes the earlier key's position.
fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut normalized = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let key = key_to_string(&key);
                if normalized.contains_key(key.as_str()) {
                    warn!("Template key '{key}' appears more than once; keeping the later value");
                }
                normalized.insert(Value::String(key), normalize_keys(value));
            }
            Value::Mapping(normalized)
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Returns the string form of a mapping key.
pub(crate) fn key_to_string(key: &Value) -> String {
    display_scalar(key)
}
