//! Service layer for file-system access.
//!
//! This module contains services that keep file handling out of the form
//! and export logic.

pub mod templates;

// Re-export commonly used types and functions
pub use templates::TemplateService;
