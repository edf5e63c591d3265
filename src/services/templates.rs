//! Template directory service.
//!
//! This module lists and reads the `*.yml` / `*.yaml` templates offered for
//! selection. A missing or unreadable directory simply means no templates
//! are available.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::constants::ALLOWED_FILE_TYPES;

/// Service for template file operations.
pub struct TemplateService;

impl TemplateService {
    /// Lists template file names in `dir`, sorted alphabetically.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use yamlform::services::TemplateService;
    ///
    /// for name in TemplateService::list_template_files(Path::new("templates")) {
    ///     println!("{name}");
    /// }
    /// ```
    #[must_use]
    pub fn list_template_files(dir: &Path) -> Vec<String> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No templates available in {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut files: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_template_extension(path))
            .filter_map(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .collect();

        files.sort();
        files
    }

    /// Reads a template by file name.
    ///
    /// Returns `None` if the name is unsafe, the file does not exist, has
    /// the wrong extension or cannot be read.
    #[must_use]
    pub fn load_template_file(dir: &Path, filename: &str) -> Option<String> {
        match Self::read(dir, filename) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Template {filename} unavailable: {e:#}");
                None
            }
        }
    }

    /// Reads a template by file name, reporting why it failed.
    pub fn read(dir: &Path, filename: &str) -> Result<String> {
        let path = Self::resolve(dir, filename)?;
        if !path.is_file() {
            bail!("Template file not found: {}", path.display());
        }
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template file: {}", path.display()))
    }

    /// Resolves a template file name inside `dir`.
    ///
    /// The name must be a plain file name with a `.yml` or `.yaml` extension.
    pub fn resolve(dir: &Path, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;

        let path = dir.join(filename);
        if !has_template_extension(&path) {
            bail!("Templates must have a .yml or .yaml extension: {filename}");
        }

        Ok(path)
    }
}

/// Validates a template filename to prevent path traversal.
pub fn validate_filename(filename: &str) -> Result<&str> {
    if filename.is_empty() {
        bail!("Filename cannot be empty");
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        bail!("Invalid filename: path traversal not allowed");
    }

    if filename.starts_with('.') {
        bail!("Invalid filename: hidden files not allowed");
    }

    Ok(filename)
}

/// Returns true for `.yml` / `.yaml` paths (case-insensitive).
pub fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_FILE_TYPES
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_template_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("zeta.yml"), "a: 1").unwrap();
        fs::write(temp_dir.path().join("alpha.yaml"), "a: 1").unwrap();
        fs::write(temp_dir.path().join("beta.YML"), "a: 1").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(temp_dir.path().join("dir.yaml")).unwrap();

        let files = TemplateService::list_template_files(temp_dir.path());
        assert_eq!(files, ["alpha.yaml", "beta.YML", "zeta.yml"]);
    }

    #[test]
    fn test_list_template_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(TemplateService::list_template_files(&missing).is_empty());
    }

    #[test]
    fn test_load_template_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app.yaml"), "name: app\n").unwrap();
        fs::write(temp_dir.path().join("app.txt"), "name: app\n").unwrap();

        assert_eq!(
            TemplateService::load_template_file(temp_dir.path(), "app.yaml").as_deref(),
            Some("name: app\n")
        );
        assert!(TemplateService::load_template_file(temp_dir.path(), "app.txt").is_none());
        assert!(TemplateService::load_template_file(temp_dir.path(), "missing.yaml").is_none());
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("web_app.yaml").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("../secret.yaml").is_err());
        assert!(validate_filename("foo/bar.yaml").is_err());
        assert!(validate_filename("\\Windows\\x.yml").is_err());
        assert!(validate_filename(".hidden.yaml").is_err());
    }
}
