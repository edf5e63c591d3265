//! Loaded template data structure.

use serde_yml::{Mapping, Value};

/// A parsed YAML template ready to drive a form.
///
/// The template keeps the working ("project") mapping separately from the
/// optional cosmetic wrapper key so the renderer never has to look through
/// the wrapper, while exports can put it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Single outer key stripped for editing, if the document had one
    root_key: Option<String>,
    /// The mapping the form is generated from
    project: Mapping,
    /// Keys of `project` in document order
    key_order: Vec<String>,
}

impl Template {
    /// Creates a template from an already un-wrapped project mapping.
    ///
    /// Keys of `project` must already be strings; the key order is taken
    /// from the mapping's insertion order.
    #[must_use]
    pub fn new(root_key: Option<String>, project: Mapping) -> Self {
        let key_order = project
            .keys()
            .filter_map(|key| key.as_str().map(str::to_string))
            .collect();

        Self {
            root_key,
            project,
            key_order,
        }
    }

    /// Returns the wrapper key detected at load time.
    #[must_use]
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    /// Returns the working mapping.
    #[must_use]
    pub fn project(&self) -> &Mapping {
        &self.project
    }

    /// Returns the working mapping's keys in their original order.
    #[must_use]
    pub fn key_order(&self) -> &[String] {
        &self.key_order
    }

    /// Number of top-level fields in the working mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.project.len()
    }

    /// Returns true if the working mapping has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
    }

    /// Re-applies the root key (if any) around `data`.
    #[must_use]
    pub fn wrap(&self, data: Mapping) -> Mapping {
        match &self.root_key {
            Some(root) => {
                let mut wrapped = Mapping::new();
                wrapped.insert(Value::String(root.clone()), Value::Mapping(data));
                wrapped
            }
            None => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, Value)]) -> Mapping {
        let mut map = Mapping::new();
        for (key, value) in pairs {
            map.insert(Value::String((*key).to_string()), value.clone());
        }
        map
    }

    #[test]
    fn test_key_order_follows_insertion() {
        let project = mapping(&[
            ("zeta", Value::Bool(true)),
            ("alpha", Value::String("a".to_string())),
            ("mid", Value::Number(3.into())),
        ]);
        let template = Template::new(None, project);

        assert_eq!(template.key_order(), ["zeta", "alpha", "mid"]);
        assert_eq!(template.len(), 3);
        assert!(template.root_key().is_none());
    }

    #[test]
    fn test_wrap_with_root_key() {
        let project = mapping(&[("name", Value::String("Demo".to_string()))]);
        let template = Template::new(Some("Project".to_string()), project.clone());

        let wrapped = template.wrap(project.clone());
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped.get("Project"), Some(&Value::Mapping(project)));
    }

    #[test]
    fn test_wrap_without_root_key_is_identity() {
        let project = mapping(&[("debug", Value::Bool(false))]);
        let template = Template::new(None, project.clone());

        assert_eq!(template.wrap(project.clone()), project);
    }
}
