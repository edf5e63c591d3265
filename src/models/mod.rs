//! Data models for templates and form fields.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of the web shell and the CLI.

pub mod field;
pub mod template;

// Re-export all model types
pub use field::{classify, is_category_structure, FieldKind, NumberValue};
pub use template::Template;
