//! Shared test fixtures for yamlform integration tests.
#![allow(dead_code)] // Each test binary uses a different subset

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Template with a root key, scalars, a string list and nested panels.
pub const WEB_APP_TEMPLATE: &str = "\
WebApp:
  name: my-service
  version: 1
  debug: false
  timeout: 2.5
  environments: [development, staging, production]
  database:
    host: localhost
    port: 5432
";

/// Template without a root key holding a category structure.
pub const LANGUAGES_TEMPLATE: &str = "\
project_name: polyglot
languages:
  compiled:
    - name: Rust
      code: rs
    - name: Go
      code: go
  interpreted:
    - name: Python
      code: py
";

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write template");
    path
}

/// Creates a temp dir holding one template file.
pub fn temp_template(name: &str, content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_template(temp_dir.path(), name, content);
    (path, temp_dir)
}

/// Creates a temp templates directory with both sample templates and one
/// file that is not a template.
pub fn temp_templates_dir() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_template(temp_dir.path(), "web_app.yaml", WEB_APP_TEMPLATE);
    write_template(temp_dir.path(), "languages.yml", LANGUAGES_TEMPLATE);
    write_template(temp_dir.path(), "README.md", "# not a template\n");
    temp_dir
}
