//! Configuration loading, validation, and env substitution.
//!
//! Config files: `visage.toml`, `visage.yaml`, or `visage.json`
//! Searched in `./` then `~/.config/visage/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{discover_and_load, load_config},
    schema::{DatabaseConfig, DisplayConfig, NameFormatConfig, ServerConfig, VisageConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate_config},
};
