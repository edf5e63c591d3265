//! Parsing of YAML template files.
//!
//! This module turns raw template text into a [`Template`](crate::models::Template),
//! detecting the optional root wrapper key along the way.

pub mod template;

// Re-export commonly used functions
pub use template::parse_template;
