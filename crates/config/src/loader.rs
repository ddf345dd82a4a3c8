use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Context, Result},
    schema::VisageConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["visage.toml", "visage.yaml", "visage.yml", "visage.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<VisageConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

fn parse_config(raw: &str, path: &Path) -> Result<VisageConfig> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match ext {
        "toml" => toml::from_str(raw).context("invalid TOML"),
        "yaml" | "yml" => serde_yaml::from_str(raw).context("invalid YAML"),
        "json" => serde_json::from_str(raw).context("invalid JSON"),
        other => None.with_context(|| format!("unsupported config extension: {other:?}")),
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./visage.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/visage/visage.{toml,yaml,yml,json}` (user-global)
///
/// Returns `VisageConfig::default()` if no config file is found or the found
/// file fails to parse (configuration absence is never fatal).
pub fn discover_and_load() -> VisageConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    VisageConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/visage/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "visage") {
        for name in CONFIG_FILENAMES {
            let p = dirs.config_dir().join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}
