//! Config schema types (server, database, display).

use serde::{Deserialize, Serialize};

/// The sentinel template value meaning "use the locale-provided default".
pub const LANGUAGE_SENTINEL: &str = "language";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisageConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub display: DisplayConfig,
}

/// Admin gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
    /// Base URL used when building absolute profile and picture links.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8370,
            base_url: "http://127.0.0.1:8370".into(),
        }
    }
}

/// SQLite database location for the plugin registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the database file; `:memory:` keeps everything in-process.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "visage.db".into(),
        }
    }
}

/// Identity display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// When set, every user's firstname is replaced with this value before
    /// formatting (default-format path only).
    pub force_firstname: Option<String>,
    /// Lastname counterpart of `force_firstname`.
    pub force_lastname: Option<String>,
    /// Default full-name template; name tokens appear literally, e.g.
    /// `"lastname, firstname"`. Unset or `"language"` falls back to the
    /// locale-provided template.
    pub fullname_template: Option<String>,
    /// Template used when a caller asks for the alternate (complete) format.
    pub alternate_fullname_template: Option<String>,
    /// Stand-in user substituted when a disguise policy hides the real one.
    pub anonymous_user_id: i64,
    pub anonymous_user_name: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            force_firstname: None,
            force_lastname: None,
            fullname_template: None,
            alternate_fullname_template: None,
            anonymous_user_id: 1,
            anonymous_user_name: "Guest".into(),
        }
    }
}

/// The slice of [`DisplayConfig`] the name formatter consumes, built once at
/// the request boundary so the formatter never reads ambient state.
#[derive(Debug, Clone, Default)]
pub struct NameFormatConfig {
    pub force_firstname: Option<String>,
    pub force_lastname: Option<String>,
    pub fullname_template: Option<String>,
    pub alternate_fullname_template: Option<String>,
}

impl NameFormatConfig {
    /// Treats the `"language"` sentinel and empty strings as unset.
    fn normalize(template: &Option<String>) -> Option<String> {
        template
            .as_deref()
            .filter(|t| !t.is_empty() && *t != LANGUAGE_SENTINEL)
            .map(str::to_owned)
    }
}

impl From<&DisplayConfig> for NameFormatConfig {
    fn from(cfg: &DisplayConfig) -> Self {
        Self {
            force_firstname: cfg.force_firstname.clone().filter(|s| !s.is_empty()),
            force_lastname: cfg.force_lastname.clone().filter(|s| !s.is_empty()),
            fullname_template: Self::normalize(&cfg.fullname_template),
            alternate_fullname_template: Self::normalize(&cfg.alternate_fullname_template),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = VisageConfig::default();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.display.anonymous_user_id, 1);
        assert!(cfg.display.fullname_template.is_none());
    }

    #[test]
    fn language_sentinel_reads_as_unset() {
        let display = DisplayConfig {
            fullname_template: Some("language".into()),
            alternate_fullname_template: Some("firstname alternatename lastname".into()),
            ..DisplayConfig::default()
        };
        let format = NameFormatConfig::from(&display);
        assert!(format.fullname_template.is_none());
        assert_eq!(
            format.alternate_fullname_template.as_deref(),
            Some("firstname alternatename lastname")
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: VisageConfig = toml::from_str(
            r#"
            [display]
            force_firstname = "Redacted"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.display.force_firstname.as_deref(), Some("Redacted"));
        assert_eq!(cfg.server.port, 8370);
    }
}
