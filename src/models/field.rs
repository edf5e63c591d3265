//! Field classification.
//!
//! Every template value is classified exactly once into a [`FieldKind`],
//! which the renderer then pattern-matches. Values that fit none of the
//! supported shapes classify to `None` and are left out of the form.

use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value};

/// Numeric field value, keeping the template's integer/float subtype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberValue {
    /// Whole number
    Integer(i64),
    /// Whole number above `i64::MAX`
    Unsigned(u64),
    /// Floating point number
    Float(f64),
}

impl NumberValue {
    /// Converts a YAML number, preferring the integer subtypes when they fit.
    #[must_use]
    pub fn from_yaml(number: &serde_yml::Number) -> Option<Self> {
        if let Some(i) = number.as_i64() {
            Some(Self::Integer(i))
        } else if let Some(u) = number.as_u64() {
            Some(Self::Unsigned(u))
        } else {
            number.as_f64().map(Self::Float)
        }
    }

    /// Returns true for the integer subtypes.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_) | Self::Unsigned(_))
    }

    /// Coerces `self` into the subtype of `template`.
    ///
    /// An integer field given a float keeps the integer subtype (truncating),
    /// a float field given an integer widens it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn coerce_like(self, template: Self) -> Self {
        match (template, self) {
            (Self::Integer(_) | Self::Unsigned(_), Self::Float(f)) => Self::Integer(f as i64),
            (Self::Float(_), Self::Integer(i)) => Self::Float(i as f64),
            (Self::Float(_), Self::Unsigned(u)) => Self::Float(u as f64),
            (_, value) => value,
        }
    }

    /// Converts back into a YAML value.
    #[must_use]
    pub fn to_yaml(self) -> Value {
        match self {
            Self::Integer(i) => Value::Number(i.into()),
            Self::Unsigned(u) => Value::Number(u.into()),
            Self::Float(f) => Value::Number(f.into()),
        }
    }
}

/// The form control a template value maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind<'a> {
    /// Single-line text input
    Text(&'a str),
    /// Checkbox
    Flag(bool),
    /// Numeric input
    Number(NumberValue),
    /// Multi-select over the listed strings
    StringList(Vec<&'a str>),
    /// Tabs of multi-selects over named items
    Category(&'a Mapping),
    /// Expandable panel of sub-fields
    Nested(&'a Mapping),
}

/// Classifies a template value, in dispatch priority order.
///
/// Returns `None` for shapes the form does not support (null, tagged
/// values, sequences holding anything but strings).
#[must_use]
pub fn classify(value: &Value) -> Option<FieldKind<'_>> {
    match value {
        Value::String(s) => Some(FieldKind::Text(s)),
        Value::Bool(b) => Some(FieldKind::Flag(*b)),
        Value::Number(n) => NumberValue::from_yaml(n).map(FieldKind::Number),
        Value::Sequence(items) => items
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
            .map(FieldKind::StringList),
        Value::Mapping(map) if is_category_structure(map) => Some(FieldKind::Category(map)),
        Value::Mapping(map) => Some(FieldKind::Nested(map)),
        Value::Null | Value::Tagged(_) => None,
    }
}

/// Detects a mapping of named-item lists that should render as tabs.
///
/// At least two values must be sequences, and at least one of those must
/// start with a mapping carrying a `name` key.
#[must_use]
pub fn is_category_structure(map: &Mapping) -> bool {
    let sequences: Vec<&Vec<Value>> = map.values().filter_map(Value::as_sequence).collect();

    sequences.len() >= 2
        && sequences.iter().any(|items| {
            items
                .first()
                .and_then(Value::as_mapping)
                .is_some_and(|first| first.contains_key("name"))
        })
}

/// Builds a human label from a field key.
///
/// Underscores become spaces, then every word is title-cased: a letter
/// following a non-letter is upper-cased, every other letter lower-cased.
#[must_use]
pub fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut prev_is_letter = false;

    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_is_letter {
                label.extend(ch.to_lowercase());
            } else {
                label.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            label.push(ch);
            prev_is_letter = false;
        }
    }

    label
}

/// Strips a trailing parenthetical from a category key for use as a tab label.
#[must_use]
pub fn format_tab_name(name: &str) -> String {
    name.split('(').next().unwrap_or(name).trim().to_string()
}

/// Formats a category item as a multi-select option.
///
/// Items with `name` and `code` read `"{name} ({code})"`, items with only a
/// name read `"{name}"`, anything else is stringified.
#[must_use]
pub fn format_item_display(item: &Value) -> String {
    if let Some(name) = item.as_mapping().and_then(|map| map.get("name")) {
        let name = display_scalar(name);
        return match item.get("code") {
            Some(code) => format!("{name} ({})", display_scalar(code)),
            None => name,
        };
    }
    display_scalar(item)
}

/// Maps selected option labels back to the original category items.
///
/// Each label resolves to the first item whose display string matches it
/// exactly; labels that match nothing are dropped.
#[must_use]
pub fn map_display_to_objects(selected: &[String], items: &[Value]) -> Vec<Value> {
    selected
        .iter()
        .filter_map(|label| {
            items
                .iter()
                .find(|item| format_item_display(item) == *label)
                .cloned()
        })
        .collect()
}

/// Renders a YAML value as plain text.
///
/// Strings are returned as-is, scalars use their YAML spelling, and
/// collections fall back to compact JSON.
#[must_use]
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
