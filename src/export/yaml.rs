//! YAML export and re-validation.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use serde_yml::{Mapping, Value};
use tracing::warn;

use crate::constants::NO_DATA_TEXT;

/// Scalars that only need quotes to stay strings: YAML 1.1 booleans, null
/// spellings and numbers.
const BARE_TOKEN: &str =
    r"(?:(?i:true|false|yes|no|on|off|null)|~|[-+]?(?:\d[\d_]*(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)";

/// Quoted bool/null/numeric-looking scalar in value position: after `key: `
/// or a `- ` sequence marker, running to the end of the line.
static QUOTED_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?m)(?P<lead>:[ \t]+|^[ \t]*-[ \t]+)(?:'(?P<single>{BARE_TOKEN})'|"(?P<double>{BARE_TOKEN})")[ \t]*$"#
    ))
    .expect("quoted scalar pattern is valid")
});

/// Value that opens a literal or folded block scalar (`key: |-`, `- >`).
static BLOCK_SCALAR_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^[ \t]*(?:-[ \t]+)?|:[ \t]+)[|>][-+0-9]*[ \t]*$")
        .expect("block scalar pattern is valid")
});

/// Serializes form data as block-style YAML and removes cosmetic quotes.
///
/// Keys keep their insertion order. Returns [`NO_DATA_TEXT`] when `data` is
/// empty or cannot be serialized.
#[must_use]
pub fn export_yaml(data: &Mapping) -> String {
    if data.is_empty() {
        return NO_DATA_TEXT.to_string();
    }

    match render_yaml(data) {
        Ok(yaml) => clean_yaml_quotes(&yaml),
        Err(e) => {
            warn!("YAML export failed: {e:#}");
            NO_DATA_TEXT.to_string()
        }
    }
}

/// Serializes `data` without any post-processing.
///
/// The output uses block style with a two-space indent and keeps unicode
/// characters unescaped.
pub fn render_yaml(data: &Mapping) -> Result<String> {
    serde_yml::to_string(data).context("Failed to serialize form data to YAML")
}

/// Removes quotes the serializer put around boolean, null and numeric
/// looking scalars.
///
/// Only whole scalars in value position are touched; quoted keys, strings
/// that merely contain such tokens and the body of `|` / `>` block scalars
/// keep their text.
#[must_use]
pub fn clean_yaml_quotes(yaml: &str) -> String {
    let mut cleaned = String::with_capacity(yaml.len());
    // Indent of the line that opened the current block scalar
    let mut block_parent: Option<usize> = None;

    for line in yaml.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let indent = content.len() - content.trim_start_matches([' ', '\t']).len();

        if let Some(parent) = block_parent {
            if content.trim().is_empty() || indent > parent {
                cleaned.push_str(line);
                continue;
            }
            block_parent = None;
        }

        if BLOCK_SCALAR_START.is_match(content) {
            block_parent = Some(block_parent_column(content));
        }

        let unquoted = QUOTED_SCALAR.replace_all(line, |caps: &Captures<'_>| {
            let token = caps
                .name("single")
                .or_else(|| caps.name("double"))
                .map_or("", |m| m.as_str());
            format!("{}{token}", &caps["lead"])
        });
        cleaned.push_str(&unquoted);
    }

    cleaned
}

/// Column the body of a block scalar opened on `content` is indented past.
///
/// For `key: |` that is the key's column, for a bare `- |` item the dash's.
fn block_parent_column(content: &str) -> usize {
    let mut column = content.len() - content.trim_start_matches([' ', '\t']).len();
    let mut dash_column = column;
    let mut rest = &content[column..];

    while let Some(after) = rest.strip_prefix('-') {
        let trimmed = after.trim_start_matches([' ', '\t']);
        if trimmed.len() == after.len() {
            break;
        }
        dash_column = column;
        column += rest.len() - trimmed.len();
        rest = trimmed;
    }

    if rest.starts_with(['|', '>']) {
        dash_column
    } else {
        column
    }
}

/// Outcome of re-validating exported YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YamlValidation {
    /// Whether the exported YAML parses back
    pub valid: bool,
    /// Human-readable status
    pub message: String,
}

impl YamlValidation {
    fn passed() -> Self {
        Self {
            valid: true,
            message: "YAML is valid".to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Returns the `(valid, message)` pair.
    #[must_use]
    pub fn into_parts(self) -> (bool, String) {
        (self.valid, self.message)
    }
}

/// Exports `data` and checks that the result parses as YAML again.
#[must_use]
pub fn validate_yaml(data: &Mapping) -> YamlValidation {
    if data.is_empty() {
        return YamlValidation::failed("No data to validate");
    }

    let yaml = match render_yaml(data) {
        Ok(yaml) => clean_yaml_quotes(&yaml),
        Err(e) => return YamlValidation::failed(format!("Validation error: {e:#}")),
    };

    match serde_yml::from_str::<Value>(&yaml) {
        Ok(_) => YamlValidation::passed(),
        Err(e) => YamlValidation::failed(format!("YAML validation error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml_mapping(src: &str) -> Mapping {
        serde_yml::from_str(src).unwrap()
    }

    #[test]
    fn test_export_yaml_no_data() {
        assert_eq!(export_yaml(&Mapping::new()), "No data");
    }

    #[test]
    fn test_export_yaml_keeps_insertion_order() {
        let data = yaml_mapping("zeta: 1\nalpha: two\nmid: true\n");
        let output = export_yaml(&data);

        let zeta = output.find("zeta").unwrap();
        let alpha = output.find("alpha").unwrap();
        let mid = output.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid, "keys must not be sorted: {output}");
    }

    #[test]
    fn test_export_yaml_block_style() {
        let data = yaml_mapping("Project:\n  name: Demo\n  version: 1\n  enabled: true\n");
        let output = export_yaml(&data);

        assert!(
            output.contains("Project:\n  name: Demo\n  version: 1\n  enabled: true"),
            "unexpected layout: {output}"
        );
        assert!(!output.contains('{'));
    }

    #[test]
    fn test_export_yaml_allows_unicode() {
        let data = yaml_mapping("greeting: héllo wörld ✓\n");
        assert!(export_yaml(&data).contains("héllo wörld ✓"));
    }

    #[test]
    fn test_clean_yaml_quotes() {
        let yaml_with_quotes = "\n        test: \"true\"\n        number: \"123\"\n        regular: \"text\"\n        ";
        let result = clean_yaml_quotes(yaml_with_quotes);

        assert!(!result.contains("\"true\""));
        assert!(!result.contains("\"123\""));
        assert!(result.contains("\"text\""), "regular text keeps quotes");
    }

    #[test]
    fn test_clean_yaml_quotes_single_quotes_and_sequences() {
        let yaml = "version: '1.0'\nflags:\n- 'no'\n- '-dash'\nurl: 'http://x:1'\n'42': key\n";
        let result = clean_yaml_quotes(yaml);

        assert!(result.contains("version: 1.0\n"));
        assert!(result.contains("- no\n"));
        assert!(result.contains("- '-dash'"), "strings that need quotes keep them");
        assert!(result.contains("url: 'http://x:1'"));
        assert!(result.contains("'42': key"), "quoted keys are left alone");
    }

    #[test]
    fn test_clean_yaml_quotes_leaves_block_scalars_alone() {
        let yaml = "note: |-\n  port: '5'\n  - 'true'\n\n  end\nflag: 'true'\nlist:\n- >\n  x: '1'\n- '2'\n";
        let result = clean_yaml_quotes(yaml);

        assert_eq!(
            result,
            "note: |-\n  port: '5'\n  - 'true'\n\n  end\nflag: true\nlist:\n- >\n  x: '1'\n- 2\n"
        );
    }

    #[test]
    fn test_clean_yaml_quotes_block_scalar_in_sequence_item() {
        let yaml = "- note: |-\n    a: 'true'\n  other: 'false'\n";
        let result = clean_yaml_quotes(yaml);

        assert_eq!(result, "- note: |-\n    a: 'true'\n  other: false\n");
    }

    #[test]
    fn test_export_yaml_keeps_multiline_strings() {
        let mut data = Mapping::new();
        data.insert(
            Value::String("note".to_string()),
            Value::String("port: '5'\n- 'true'\nend".to_string()),
        );
        data.insert(
            Value::String("version".to_string()),
            Value::String("2".to_string()),
        );

        let exported: Mapping = serde_yml::from_str(&export_yaml(&data)).unwrap();

        assert_eq!(
            exported.get("note").and_then(Value::as_str),
            Some("port: '5'\n- 'true'\nend")
        );
        // Outside block scalars the cosmetic unquoting still applies
        assert_eq!(exported.get("version").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_validate_yaml_no_data() {
        let result = validate_yaml(&Mapping::new());
        assert_eq!(
            result.into_parts(),
            (false, "No data to validate".to_string())
        );
    }

    #[test]
    fn test_validate_yaml_valid() {
        let data = yaml_mapping("name: Demo\nports: [80, 443]\nnested: {a: '-x', b: 'key: value'}\n");
        let result = validate_yaml(&data);
        assert!(result.valid, "{}", result.message);
        assert_eq!(result.message, "YAML is valid");
    }
}
