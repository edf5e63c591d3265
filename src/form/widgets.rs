//! Widget collaborator for the form renderer.
//!
//! The renderer never talks to a concrete UI. It asks a [`FormUi`] to
//! "render a field of type T with label L and default V" and receives the
//! user-edited value for the current pass. [`RecordingUi`] is the
//! implementation used by the web shell and the CLI: it answers from a
//! [`WidgetState`] and records a [`FieldView`] tree describing what was
//! rendered.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::WIDGET_PREFIXES;
use crate::models::NumberValue;

/// Structural sections the renderer opens around groups of widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// A titled tab bar; each child is a [`Section::Tab`]
    Tabs {
        /// Heading shown above the tabs
        label: &'a str,
    },
    /// One tab inside a tab bar
    Tab {
        /// Tab label
        label: &'a str,
    },
    /// Expandable panel holding nested fields
    Expander {
        /// Panel heading
        label: &'a str,
        /// Whether the panel starts open
        expanded: bool,
    },
}

/// Presentation collaborator driven by the form renderer.
///
/// Each widget method receives a stable widget key, a label and the template
/// default, and returns the value the user currently has in that widget.
pub trait FormUi {
    /// Single-line text input.
    fn text_input(&mut self, key: &str, label: &str, default: &str) -> String;

    /// Checkbox.
    fn checkbox(&mut self, key: &str, label: &str, default: bool) -> bool;

    /// Numeric input; the returned value must keep the default's subtype.
    fn number_input(&mut self, key: &str, label: &str, default: NumberValue) -> NumberValue;

    /// Multi-select over `options`, starting from `default` selected.
    fn multiselect(
        &mut self,
        key: &str,
        label: &str,
        options: &[String],
        default: &[String],
    ) -> Vec<String>;

    /// Opens a section; widgets rendered until the matching
    /// [`close_section`](FormUi::close_section) belong to it.
    fn open_section(&mut self, section: Section<'_>);

    /// Closes the innermost open section.
    fn close_section(&mut self);
}

/// A value the user entered into a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetValue {
    /// Checkbox state
    Flag(bool),
    /// Whole number
    Integer(i64),
    /// Whole number above `i64::MAX`
    Unsigned(u64),
    /// Floating point number
    Float(f64),
    /// Text input content
    Text(String),
    /// Multi-select selection
    Selection(Vec<String>),
}

impl WidgetValue {
    fn as_number(&self) -> Option<NumberValue> {
        match self {
            Self::Integer(i) => Some(NumberValue::Integer(*i)),
            Self::Unsigned(u) => Some(NumberValue::Unsigned(*u)),
            Self::Float(f) => Some(NumberValue::Float(*f)),
            _ => None,
        }
    }
}

/// Per-session widget values keyed by widget key.
///
/// A key without an entry means the widget still shows its template default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetState {
    values: HashMap<String, WidgetValue>,
}

impl WidgetState {
    /// Creates an empty widget state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for a widget key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WidgetValue> {
        self.values.get(key)
    }

    /// Stores a widget value.
    pub fn set(&mut self, key: impl Into<String>, value: WidgetValue) {
        self.values.insert(key.into(), value);
    }

    /// Merges a batch of widget values, overwriting existing keys.
    pub fn merge(&mut self, values: impl IntoIterator<Item = (String, WidgetValue)>) {
        self.values.extend(values);
    }

    /// Drops every form widget value (all known widget prefixes).
    pub fn clear_form_widgets(&mut self) {
        self.values
            .retain(|key, _| !WIDGET_PREFIXES.iter().any(|prefix| key.starts_with(prefix)));
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Description of one rendered widget or section, sent to the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldView {
    /// Text input
    Text {
        /// Widget key
        key: String,
        /// Field label
        label: String,
        /// Current value
        value: String,
    },
    /// Checkbox
    Checkbox {
        /// Widget key
        key: String,
        /// Field label
        label: String,
        /// Current value
        value: bool,
    },
    /// Number input
    Number {
        /// Widget key
        key: String,
        /// Field label
        label: String,
        /// Current value
        value: NumberValue,
        /// True when the field only accepts whole numbers
        integer: bool,
    },
    /// Multi-select
    MultiSelect {
        /// Widget key
        key: String,
        /// Field label
        label: String,
        /// Available options
        options: Vec<String>,
        /// Currently selected options
        selected: Vec<String>,
    },
    /// Tab bar
    Tabs {
        /// Heading
        label: String,
        /// One [`FieldView::Tab`] per category
        children: Vec<FieldView>,
    },
    /// Single tab
    Tab {
        /// Tab label
        label: String,
        /// Widgets inside the tab
        children: Vec<FieldView>,
    },
    /// Expandable panel
    Expander {
        /// Heading
        label: String,
        /// Whether the panel starts open
        expanded: bool,
        /// Nested widgets
        children: Vec<FieldView>,
    },
}

impl FieldView {
    fn children_mut(&mut self) -> Option<&mut Vec<FieldView>> {
        match self {
            Self::Tabs { children, .. }
            | Self::Tab { children, .. }
            | Self::Expander { children, .. } => Some(children),
            _ => None,
        }
    }
}

/// [`FormUi`] that answers from stored widget state and records the views.
///
/// Widget keys are unique within one pass. A key rendered twice (a top-level
/// `a_b` next to a nested `a.b`, say) is renamed to `{key}#2`, `{key}#3`, ...
/// so the two fields never share a stored value.
pub struct RecordingUi<'a> {
    state: &'a WidgetState,
    roots: Vec<FieldView>,
    open: Vec<FieldView>,
    claimed: HashSet<String>,
}

impl<'a> RecordingUi<'a> {
    /// Creates a recorder reading user values from `state`.
    #[must_use]
    pub fn new(state: &'a WidgetState) -> Self {
        Self {
            state,
            roots: Vec::new(),
            open: Vec::new(),
            claimed: HashSet::new(),
        }
    }

    /// Finishes the pass and returns the recorded top-level views.
    ///
    /// Sections left open are closed implicitly.
    #[must_use]
    pub fn finish(mut self) -> Vec<FieldView> {
        while !self.open.is_empty() {
            self.close_section();
        }
        self.roots
    }

    /// Reserves `key` for this pass, renaming it if it is already taken.
    fn claim_key(&mut self, key: &str) -> String {
        if self.claimed.insert(key.to_string()) {
            return key.to_string();
        }

        let unique = (2..)
            .map(|n| format!("{key}#{n}"))
            .find(|candidate| !self.claimed.contains(candidate))
            .unwrap_or_else(|| key.to_string());
        warn!("Duplicate widget key '{key}', rendering it as '{unique}'");
        self.claimed.insert(unique.clone());
        unique
    }

    fn push(&mut self, view: FieldView) {
        match self.open.last_mut().and_then(FieldView::children_mut) {
            Some(children) => children.push(view),
            None => self.roots.push(view),
        }
    }
}

impl FormUi for RecordingUi<'_> {
    fn text_input(&mut self, key: &str, label: &str, default: &str) -> String {
        let key = self.claim_key(key);
        let value = match self.state.get(&key) {
            Some(WidgetValue::Text(text)) => text.clone(),
            _ => default.to_string(),
        };
        self.push(FieldView::Text {
            key,
            label: label.to_string(),
            value: value.clone(),
        });
        value
    }

    fn checkbox(&mut self, key: &str, label: &str, default: bool) -> bool {
        let key = self.claim_key(key);
        let value = match self.state.get(&key) {
            Some(WidgetValue::Flag(flag)) => *flag,
            _ => default,
        };
        self.push(FieldView::Checkbox {
            key,
            label: label.to_string(),
            value,
        });
        value
    }

    fn number_input(&mut self, key: &str, label: &str, default: NumberValue) -> NumberValue {
        let key = self.claim_key(key);
        let value = self
            .state
            .get(&key)
            .and_then(WidgetValue::as_number)
            .map_or(default, |n| n.coerce_like(default));
        self.push(FieldView::Number {
            key,
            label: label.to_string(),
            value,
            integer: default.is_integer(),
        });
        value
    }

    fn multiselect(
        &mut self,
        key: &str,
        label: &str,
        options: &[String],
        default: &[String],
    ) -> Vec<String> {
        let key = self.claim_key(key);
        let selected: Vec<String> = match self.state.get(&key) {
            // Stale selections that are no longer offered are ignored
            Some(WidgetValue::Selection(values)) => values
                .iter()
                .filter(|value| options.contains(value))
                .cloned()
                .collect(),
            _ => default.to_vec(),
        };
        self.push(FieldView::MultiSelect {
            key,
            label: label.to_string(),
            options: options.to_vec(),
            selected: selected.clone(),
        });
        selected
    }

    fn open_section(&mut self, section: Section<'_>) {
        let view = match section {
            Section::Tabs { label } => FieldView::Tabs {
                label: label.to_string(),
                children: Vec::new(),
            },
            Section::Tab { label } => FieldView::Tab {
                label: label.to_string(),
                children: Vec::new(),
            },
            Section::Expander { label, expanded } => FieldView::Expander {
                label: label.to_string(),
                expanded,
                children: Vec::new(),
            },
        };
        self.open.push(view);
    }

    fn close_section(&mut self) {
        if let Some(view) = self.open.pop() {
            self.push(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_ui_uses_defaults_without_state() {
        let state = WidgetState::new();
        let mut ui = RecordingUi::new(&state);

        assert_eq!(ui.text_input("field_name", "Name", "Demo"), "Demo");
        assert!(ui.checkbox("bool_debug", "Debug", true));
        assert_eq!(
            ui.number_input("num_port", "Port", NumberValue::Integer(80)),
            NumberValue::Integer(80)
        );

        let views = ui.finish();
        assert_eq!(views.len(), 3);
    }

    #[test]
    fn test_recording_ui_prefers_stored_values() {
        let mut state = WidgetState::new();
        state.set("field_name", WidgetValue::Text("Edited".to_string()));
        state.set("num_rate", WidgetValue::Integer(2));
        state.set(
            "multi_tags",
            WidgetValue::Selection(vec!["b".to_string(), "gone".to_string()]),
        );

        let mut ui = RecordingUi::new(&state);
        assert_eq!(ui.text_input("field_name", "Name", "Demo"), "Edited");
        assert_eq!(
            ui.number_input("num_rate", "Rate", NumberValue::Float(0.5)),
            NumberValue::Float(2.0)
        );

        let options = vec!["a".to_string(), "b".to_string()];
        let selected = ui.multiselect("multi_tags", "Tags", &options, &options);
        assert_eq!(selected, vec!["b".to_string()]);
    }

    #[test]
    fn test_mismatched_widget_value_falls_back_to_default() {
        let mut state = WidgetState::new();
        state.set("bool_debug", WidgetValue::Text("yes".to_string()));

        let mut ui = RecordingUi::new(&state);
        assert!(!ui.checkbox("bool_debug", "Debug", false));
    }

    #[test]
    fn test_sections_nest_views() {
        let state = WidgetState::new();
        let mut ui = RecordingUi::new(&state);

        ui.open_section(Section::Expander {
            label: "Database",
            expanded: true,
        });
        ui.text_input("field_database_host", "Database Host", "localhost");
        ui.close_section();
        ui.checkbox("bool_debug", "Debug", false);

        let views = ui.finish();
        assert_eq!(views.len(), 2);
        match &views[0] {
            FieldView::Expander {
                label, children, ..
            } => {
                assert_eq!(label, "Database");
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected expander, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_key_gets_its_own_value() {
        let mut state = WidgetState::new();
        state.set("field_a_b", WidgetValue::Text("edited".to_string()));

        let mut ui = RecordingUi::new(&state);
        assert_eq!(ui.text_input("field_a_b", "A B", "top"), "edited");
        assert_eq!(ui.text_input("field_a_b", "A B", "nested"), "nested");

        let views = ui.finish();
        assert!(matches!(&views[1], FieldView::Text { key, .. } if key == "field_a_b#2"));
    }

    #[test]
    fn test_renamed_key_reads_its_own_state() {
        let mut state = WidgetState::new();
        state.set("bool_flag#2", WidgetValue::Flag(true));

        let mut ui = RecordingUi::new(&state);
        assert!(!ui.checkbox("bool_flag", "Flag", false));
        assert!(ui.checkbox("bool_flag", "Flag", false));
    }

    #[test]
    fn test_clear_form_widgets_keeps_foreign_keys() {
        let mut state = WidgetState::new();
        state.set("field_name", WidgetValue::Text("x".to_string()));
        state.set("cat_langs_rust", WidgetValue::Selection(Vec::new()));
        state.set("theme", WidgetValue::Text("dark".to_string()));

        state.clear_form_widgets();

        assert_eq!(state.len(), 1);
        assert!(state.get("theme").is_some());
    }

    #[test]
    fn test_widget_value_deserializes_untagged() {
        let values: HashMap<String, WidgetValue> = serde_json::from_str(
            r#"{"a": true, "b": 3, "c": 1.5, "d": "text", "e": ["x", "y"]}"#,
        )
        .unwrap();

        assert_eq!(values["a"], WidgetValue::Flag(true));
        assert_eq!(values["b"], WidgetValue::Integer(3));
        assert_eq!(values["c"], WidgetValue::Float(1.5));
        assert_eq!(values["d"], WidgetValue::Text("text".to_string()));
        assert_eq!(
            values["e"],
            WidgetValue::Selection(vec!["x".to_string(), "y".to_string()])
        );
    }
}
