//! Per-session editing context.
//!
//! A [`SessionContext`] holds everything one user's editing session needs
//! between render passes: the form generator, widget values, which template
//! was selected or uploaded, and the last validation result. Clearing the
//! session replaces the whole context instead of resetting fields one by one.

use serde::Serialize;
use serde_yml::Mapping;
use tracing::info;

use crate::constants::SUCCESS_MESSAGE;
use crate::export::{self, YamlValidation};
use crate::form::{FieldView, FormGenerator, RecordingUi, WidgetState, WidgetValue};

/// Result of offering a template to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The template was installed; carries the user-facing message
    Loaded(String),
    /// Same selection or upload as before, nothing to do
    Unchanged,
    /// The content was not a usable template; the previous one is kept
    Rejected,
}

/// Output of one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedForm {
    /// Rendered widgets and sections
    pub fields: Vec<FieldView>,
    /// Structured data in original key order, wrapped under the root key
    #[serde(skip)]
    pub data: Mapping,
    /// YAML preview of `data`
    pub preview: String,
    /// True when the form produced any data
    pub has_data: bool,
}

/// Explicit per-session state passed into every render pass.
#[derive(Debug, Clone)]
pub struct SessionContext {
    generator: FormGenerator,
    widgets: WidgetState,
    uploaded_file: Option<String>,
    selected_template: Option<String>,
    message: Option<String>,
    uploader_key: u32,
    validation: Option<YamlValidation>,
    expander_expanded: bool,
}

impl SessionContext {
    /// Creates a fresh session.
    #[must_use]
    pub fn new(expander_expanded: bool) -> Self {
        Self::with_uploader_key(expander_expanded, 0)
    }

    fn with_uploader_key(expander_expanded: bool, uploader_key: u32) -> Self {
        Self {
            generator: FormGenerator::new().with_expanded_panels(expander_expanded),
            widgets: WidgetState::new(),
            uploaded_file: None,
            selected_template: None,
            message: None,
            uploader_key,
            validation: None,
            expander_expanded,
        }
    }

    /// Offers a template picked from the template directory.
    ///
    /// Loads only when the selection differs from the current one.
    pub fn select_template(&mut self, name: &str, content: &str) -> LoadOutcome {
        if self.selected_template.as_deref() == Some(name) {
            return LoadOutcome::Unchanged;
        }

        self.selected_template = Some(name.to_string());
        self.install(content, format!("Template '{name}' loaded successfully"))
    }

    /// Offers an uploaded template.
    ///
    /// Loads only when the upload differs from the current one.
    pub fn upload(&mut self, name: &str, content: &str) -> LoadOutcome {
        if self.uploaded_file.as_deref() == Some(name) && self.generator.has_template() {
            return LoadOutcome::Unchanged;
        }

        self.uploaded_file = Some(name.to_string());
        self.install(content, SUCCESS_MESSAGE.to_string())
    }

    fn install(&mut self, content: &str, message: String) -> LoadOutcome {
        if !self.generator.load_template(content) {
            return LoadOutcome::Rejected;
        }

        // Values typed for a previous template must not leak into this one
        self.widgets.clear_form_widgets();
        self.validation = None;
        self.message = Some(message.clone());
        info!("{message}");
        LoadOutcome::Loaded(message)
    }

    /// Merges edited widget values; a previous validation result no longer
    /// describes the data and is dropped.
    pub fn update_widgets(&mut self, values: impl IntoIterator<Item = (String, WidgetValue)>) {
        self.widgets.merge(values);
        self.validation = None;
    }

    /// Runs one render pass over the current widget state.
    pub fn render(&mut self) -> RenderedForm {
        let mut ui = RecordingUi::new(&self.widgets);
        let has_data = !self.generator.render_form(&mut ui).is_empty();
        let fields = ui.finish();

        let data = self.generator.get_structured_data();
        let preview = export::export_yaml(&data);

        RenderedForm {
            fields,
            data,
            preview,
            has_data,
        }
    }

    /// Structured data of the latest render pass.
    #[must_use]
    pub fn structured_data(&self) -> Mapping {
        self.generator.get_structured_data()
    }

    /// Validates the exported YAML and remembers the result.
    pub fn validate(&mut self) -> YamlValidation {
        let result = export::validate_yaml(&self.structured_data());
        self.validation = Some(result.clone());
        result
    }

    /// Resets the session to defaults.
    ///
    /// The uploader key is bumped so the front end drops its file input.
    pub fn clear(&mut self) {
        *self = Self::with_uploader_key(self.expander_expanded, self.uploader_key + 1);
    }

    /// The form generator.
    #[must_use]
    pub fn generator(&self) -> &FormGenerator {
        &self.generator
    }

    /// Current widget values.
    #[must_use]
    pub fn widgets(&self) -> &WidgetState {
        &self.widgets
    }

    /// Name of the last uploaded file.
    #[must_use]
    pub fn uploaded_file(&self) -> Option<&str> {
        self.uploaded_file.as_deref()
    }

    /// Name of the last selected template.
    #[must_use]
    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    /// Message from the last successful load.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Counter bumped on every clear.
    #[must_use]
    pub fn uploader_key(&self) -> u32 {
        self.uploader_key
    }

    /// Result of the last validation, if still current.
    #[must_use]
    pub fn validation(&self) -> Option<&YamlValidation> {
        self.validation.as_ref()
    }

    /// True once the current data has been validated successfully.
    #[must_use]
    pub fn yaml_is_valid(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.valid)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(true)
    }
}
