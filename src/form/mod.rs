//! Form generation from YAML templates.
//!
//! [`FormGenerator`] owns the loaded template and rebuilds the form state on
//! every render pass by walking the template and asking a [`FormUi`] for the
//! current value of each widget.

pub mod widgets;

use serde_yml::{Mapping, Value};
use tracing::{debug, warn};

use crate::constants::{BOOL_PREFIX, CAT_PREFIX, FIELD_PREFIX, MULTI_PREFIX, NUM_PREFIX};
use crate::models::field::{
    classify, field_label, format_item_display, format_tab_name, map_display_to_objects,
    FieldKind,
};
use crate::models::Template;
use crate::parser::{self, template::key_to_string};

pub use widgets::{FieldView, FormUi, RecordingUi, Section, WidgetState, WidgetValue};

/// Generates dynamic forms from YAML templates.
#[derive(Debug, Clone)]
pub struct FormGenerator {
    template: Option<Template>,
    form_data: Mapping,
    expander_expanded: bool,
}

impl FormGenerator {
    /// Creates a generator with no template loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: None,
            form_data: Mapping::new(),
            expander_expanded: true,
        }
    }

    /// Sets whether nested panels start expanded.
    #[must_use]
    pub fn with_expanded_panels(mut self, expanded: bool) -> Self {
        self.expander_expanded = expanded;
        self
    }

    /// Installs an already parsed template.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.install(template);
        self
    }

    fn install(&mut self, template: Template) {
        debug!(
            root_key = template.root_key().unwrap_or("<none>"),
            fields = template.len(),
            "Template loaded"
        );
        self.template = Some(template);
        self.form_data = Mapping::new();
    }

    /// Loads a template from YAML text.
    ///
    /// Returns false on a syntax error or a non-mapping root; the previously
    /// loaded template (if any) is left untouched in that case.
    pub fn load_template(&mut self, content: &str) -> bool {
        match parser::parse_template(content) {
            Ok(template) => {
                self.install(template);
                true
            }
            Err(e) => {
                warn!("Rejected template: {e:#}");
                false
            }
        }
    }

    /// Returns the loaded template.
    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Returns true once a template is loaded.
    #[must_use]
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Returns the form state collected by the last render pass.
    #[must_use]
    pub fn form_data(&self) -> &Mapping {
        &self.form_data
    }

    /// Runs one render pass and returns the fresh form state.
    ///
    /// Without a template the form state is empty.
    pub fn render_form(&mut self, ui: &mut dyn FormUi) -> &Mapping {
        self.form_data = Mapping::new();

        let Some(template) = &self.template else {
            return &self.form_data;
        };

        let mut form_data = Mapping::new();
        for (key, value) in template.project() {
            let key = key_to_string(key);
            if let Some(result) = self.render_field(ui, &key, value) {
                form_data.insert(Value::String(key), result);
            }
        }

        self.form_data = form_data;
        &self.form_data
    }

    /// Renders one field and returns its value, or `None` when omitted.
    fn render_field(&self, ui: &mut dyn FormUi, key: &str, value: &Value) -> Option<Value> {
        let label = field_label(key);

        match classify(value)? {
            FieldKind::Text(default) => {
                let result = ui.text_input(&format!("{FIELD_PREFIX}{key}"), &label, default);
                (!result.is_empty()).then_some(Value::String(result))
            }
            FieldKind::Flag(default) => {
                let result = ui.checkbox(&format!("{BOOL_PREFIX}{key}"), &label, default);
                Some(Value::Bool(result))
            }
            FieldKind::Number(default) => {
                let result = ui.number_input(&format!("{NUM_PREFIX}{key}"), &label, default);
                Some(result.to_yaml())
            }
            FieldKind::StringList(items) => {
                let options: Vec<String> = items.iter().map(|s| (*s).to_string()).collect();
                let selected =
                    ui.multiselect(&format!("{MULTI_PREFIX}{key}"), &label, &options, &options);
                (!selected.is_empty())
                    .then(|| Value::Sequence(selected.into_iter().map(Value::String).collect()))
            }
            FieldKind::Category(map) => self.render_category_tabs(ui, key, map, &label),
            FieldKind::Nested(map) => self.render_nested_object(ui, key, map, &label),
        }
    }

    /// Renders one tab of multi-selects per category key.
    fn render_category_tabs(
        &self,
        ui: &mut dyn FormUi,
        key: &str,
        categories: &Mapping,
        label: &str,
    ) -> Option<Value> {
        ui.open_section(Section::Tabs { label });
        let mut category_data = Mapping::new();

        for (cat_key, items) in categories {
            let cat_key = key_to_string(cat_key);
            let tab_name = format_tab_name(&cat_key);
            // Entries that are not lists still get a tab, just without options
            let items: &[Value] = items.as_sequence().map_or(&[][..], Vec::as_slice);
            let options: Vec<String> = items.iter().map(format_item_display).collect();

            ui.open_section(Section::Tab { label: &tab_name });
            let selected = ui.multiselect(
                &format!("{CAT_PREFIX}{key}_{cat_key}"),
                &format!("Select from {tab_name}"),
                &options,
                &options,
            );
            ui.close_section();

            if !selected.is_empty() {
                let objects = map_display_to_objects(&selected, items);
                category_data.insert(Value::String(cat_key), Value::Sequence(objects));
            }
        }

        ui.close_section();
        (!category_data.is_empty()).then_some(Value::Mapping(category_data))
    }

    /// Renders a nested mapping inside an expandable panel.
    ///
    /// Children are rendered under the composite key `{parent}_{child}` and
    /// folded back under their own names.
    fn render_nested_object(
        &self,
        ui: &mut dyn FormUi,
        key: &str,
        nested: &Mapping,
        label: &str,
    ) -> Option<Value> {
        ui.open_section(Section::Expander {
            label,
            expanded: self.expander_expanded,
        });
        let mut nested_data = Mapping::new();

        for (nested_key, nested_value) in nested {
            let nested_key = key_to_string(nested_key);
            let nested_field_key = format!("{key}_{nested_key}");
            if let Some(result) = self.render_field(ui, &nested_field_key, nested_value) {
                nested_data.insert(Value::String(nested_key), result);
            }
        }

        ui.close_section();
        (!nested_data.is_empty()).then_some(Value::Mapping(nested_data))
    }

    /// Returns the form state in original key order, re-wrapped under the
    /// root key if the template had one.
    ///
    /// Keys from the template's key order come first; any other form-state
    /// keys follow in their iteration order. An empty form state yields an
    /// empty mapping.
    #[must_use]
    pub fn get_structured_data(&self) -> Mapping {
        if self.form_data.is_empty() {
            return Mapping::new();
        }

        let key_order = self.template.as_ref().map_or(&[][..], Template::key_order);

        let mut ordered = Mapping::new();
        for key in key_order {
            if let Some(value) = self.form_data.get(key.as_str()) {
                ordered.insert(Value::String(key.clone()), value.clone());
            }
        }
        for (key, value) in &self.form_data {
            if !ordered.contains_key(key) {
                ordered.insert(key.clone(), value.clone());
            }
        }

        match &self.template {
            Some(template) => template.wrap(ordered),
            None => ordered,
        }
    }
}

impl Default for FormGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_defaults(generator: &mut FormGenerator) -> (Mapping, Vec<FieldView>) {
        let state = WidgetState::new();
        let mut ui = RecordingUi::new(&state);
        let data = generator.render_form(&mut ui).clone();
        (data, ui.finish())
    }

    #[test]
    fn test_new_generator_is_empty() {
        let generator = FormGenerator::new();
        assert!(generator.template().is_none());
        assert!(generator.form_data().is_empty());
        assert!(generator.get_structured_data().is_empty());
    }

    #[test]
    fn test_load_invalid_yaml_keeps_template_unset() {
        let mut generator = FormGenerator::new();
        assert!(!generator.load_template("invalid: yaml: content: ["));
        assert!(generator.template().is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_template() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template("name: first\n"));
        assert!(!generator.load_template("- not\n- a mapping\n"));

        let template = generator.template().unwrap();
        assert_eq!(template.key_order(), ["name"]);
    }

    #[test]
    fn test_render_without_template_is_empty() {
        let mut generator = FormGenerator::new();
        let (data, views) = render_defaults(&mut generator);
        assert!(data.is_empty());
        assert!(views.is_empty());
    }

    #[test]
    fn test_omission_rules() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template(
            "title: ''\ntags: []\ncount: 0\nenabled: false\nnothing: null\n"
        ));

        let (data, _) = render_defaults(&mut generator);

        assert!(data.get("title").is_none(), "empty strings are omitted");
        assert!(data.get("tags").is_none(), "empty selections are omitted");
        assert!(data.get("nothing").is_none(), "unsupported shapes are skipped");
        assert_eq!(data.get("count"), Some(&Value::Number(0.into())));
        assert_eq!(data.get("enabled"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_nested_fields_use_composite_keys_and_fold_back() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template(
            "database:\n  host: localhost\n  port: 5432\nname: app\n"
        ));

        let mut state = WidgetState::new();
        state.set("field_database_host", WidgetValue::Text("db.internal".to_string()));
        let mut ui = RecordingUi::new(&state);
        let data = generator.render_form(&mut ui).clone();
        let views = ui.finish();

        let database = data.get("database").unwrap();
        assert_eq!(database.get("host").unwrap(), "db.internal");
        assert_eq!(database.get("port").unwrap(), &Value::Number(5432.into()));
        assert!(data.get("database_host").is_none());

        match &views[0] {
            FieldView::Expander { label, children, .. } => {
                assert_eq!(label, "Database");
                assert!(matches!(
                    &children[0],
                    FieldView::Text { key, label, .. }
                        if key == "field_database_host" && label == "Database Host"
                ));
            }
            other => panic!("expected expander, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_key_colliding_with_top_level_key_stays_separate() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template("a_b: top\na:\n  b: nested\n"));

        let mut state = WidgetState::new();
        state.set("field_a_b", WidgetValue::Text("EDITED".to_string()));
        let mut ui = RecordingUi::new(&state);
        let data = generator.render_form(&mut ui).clone();

        assert_eq!(data.get("a_b").unwrap(), "EDITED");
        assert_eq!(data.get("a").unwrap().get("b").unwrap(), "nested");
    }

    #[test]
    fn test_large_unsigned_number_round_trips() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template("id: 18446744073709551615\nport: 80\n"));

        let (data, _) = render_defaults(&mut generator);
        assert_eq!(data.get("id").unwrap().as_u64(), Some(u64::MAX));

        let mut state = WidgetState::new();
        state.set("num_id", WidgetValue::Unsigned(u64::MAX - 1));
        let mut ui = RecordingUi::new(&state);
        let data = generator.render_form(&mut ui).clone();
        assert_eq!(data.get("id").unwrap().as_u64(), Some(u64::MAX - 1));
    }

    #[test]
    fn test_with_template_skips_parsing() {
        let template = parser::parse_template("Project:\n  name: Demo\n").unwrap();
        let mut generator = FormGenerator::new().with_template(template);

        assert!(generator.has_template());
        let (data, _) = render_defaults(&mut generator);
        assert_eq!(data.get("name").unwrap(), "Demo");
    }

    #[test]
    fn test_category_tabs_map_back_to_objects() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template(
            r"
languages:
  Compiled (fast):
    - {name: Rust, code: rs}
    - {name: Go, code: go}
  Scripting:
    - {name: Python, code: py}
"
        ));

        let mut state = WidgetState::new();
        state.set(
            "cat_languages_Compiled (fast)",
            WidgetValue::Selection(vec!["Go (go)".to_string()]),
        );
        state.set("cat_languages_Scripting", WidgetValue::Selection(Vec::new()));

        let mut ui = RecordingUi::new(&state);
        let data = generator.render_form(&mut ui).clone();
        let views = ui.finish();

        let languages = data.get("languages").unwrap().as_mapping().unwrap();
        assert_eq!(languages.len(), 1);
        let compiled = languages.get("Compiled (fast)").unwrap().as_sequence().unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].get("name").unwrap(), "Go");
        assert_eq!(compiled[0].get("code").unwrap(), "go");

        match &views[0] {
            FieldView::Tabs { label, children } => {
                assert_eq!(label, "Languages");
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], FieldView::Tab { label, .. } if label == "Compiled"));
            }
            other => panic!("expected tabs, got {other:?}"),
        }
    }

    #[test]
    fn test_structured_data_preserves_order_and_root() {
        let mut generator = FormGenerator::new();
        assert!(generator.load_template(
            "Project:\n  name: Demo\n  version: 1\n  enabled: true\n  tags: [a, b]\n"
        ));
        render_defaults(&mut generator);

        let data = generator.get_structured_data();
        assert_eq!(data.len(), 1);
        let project = data.get("Project").unwrap().as_mapping().unwrap();
        let keys: Vec<&str> = project.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["name", "version", "enabled", "tags"]);
    }

    #[test]
    fn test_collapsed_panels_setting() {
        let mut generator = FormGenerator::new().with_expanded_panels(false);
        assert!(generator.load_template("db:\n  host: x\n"));

        let (_, views) = render_defaults(&mut generator);
        assert!(matches!(&views[0], FieldView::Expander { expanded: false, .. }));
    }
}
