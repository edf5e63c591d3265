//! Dynamic YAML Form Generator Library
//!
//! This library turns an arbitrary YAML configuration template into an
//! editable form and exports the edited data back to YAML or CSV, keeping
//! the template's key order and root wrapper key.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod form;
pub mod models;
pub mod parser;
pub mod services;
pub mod session;

#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use form::FormGenerator;
pub use models::Template;
pub use session::SessionContext;
