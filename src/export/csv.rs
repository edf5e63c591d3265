//! CSV export of flattened form data.
//!
//! Every leaf becomes one `key_path,value` row. Nested mappings extend the
//! dotted key path, sequences emit one row per element under the same path.

use serde_yml::{Mapping, Value};

use crate::constants::CSV_HEADER;
use crate::models::field::display_scalar;
use crate::parser::template::key_to_string;

/// One CSV row: key path and stringified value.
pub type CsvRow = [String; 2];

/// Exports form data as CSV with minimal quoting.
///
/// Returns an empty string when `data` is empty.
#[must_use]
pub fn export_csv(data: &Mapping) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut rows: Vec<CsvRow> = vec![CSV_HEADER.map(str::to_string)];
    flatten_data(data, &mut rows, "");

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| quote_if_needed(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends one row per leaf of `data` to `rows`, depth first.
pub fn flatten_data(data: &Mapping, rows: &mut Vec<CsvRow>, prefix: &str) {
    for (key, value) in data {
        let key = key_to_string(key);
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Mapping(nested) => flatten_data(nested, rows, &path),
            Value::Sequence(items) => {
                for item in items {
                    rows.push([path.clone(), display_scalar(item)]);
                }
            }
            scalar => rows.push([path, display_scalar(scalar)]),
        }
    }
}

/// Quotes a cell only if it contains a comma, a double quote or a newline.
///
/// Inner double quotes are doubled.
#[must_use]
pub fn quote_if_needed(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
