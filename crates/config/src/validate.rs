//! Configuration validation.
//!
//! Checks a loaded [`VisageConfig`] for values that parse fine but will
//! misbehave at runtime, and reports them as diagnostics instead of failing.

use std::fmt;

use crate::schema::{LANGUAGE_SENTINEL, VisageConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "display.fullname_template"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Validate a loaded config, returning diagnostics for suspicious values.
pub fn validate_config(cfg: &VisageConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_template(
        &mut result,
        "display.fullname_template",
        cfg.display.fullname_template.as_deref(),
    );
    check_template(
        &mut result,
        "display.alternate_fullname_template",
        cfg.display.alternate_fullname_template.as_deref(),
    );

    if cfg.display.anonymous_user_id <= 0 {
        result.push(
            Severity::Error,
            "display.anonymous_user_id",
            "must be a positive user id",
        );
    }
    if cfg.display.anonymous_user_name.trim().is_empty() {
        result.push(
            Severity::Warning,
            "display.anonymous_user_name",
            "empty name; disguised users will render blank",
        );
    }

    if cfg.server.bind.trim().is_empty() {
        result.push(Severity::Error, "server.bind", "bind address is empty");
    }
    if cfg.database.path.trim().is_empty() {
        result.push(Severity::Error, "database.path", "database path is empty");
    }

    result
}

/// A template that names no known field renders as constant text for every
/// user, which is almost always a misconfiguration.
fn check_template(result: &mut ValidationResult, path: &str, template: Option<&str>) {
    let Some(template) = template else { return };
    if template == LANGUAGE_SENTINEL || template.is_empty() {
        return;
    }
    let has_token = visage_common::NameField::ALL
        .iter()
        .any(|f| template.contains(f.token()));
    if !has_token {
        result.push(
            Severity::Warning,
            path,
            format!("template {template:?} contains no recognized name field"),
        );
    }
}
