use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{ConfigError, Context, Result},
    schema::CometConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["comet.toml", "comet.json"];

/// Load config from the given path (TOML or JSON, chosen by extension).
pub fn load_config(path: &Path) -> Result<CometConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" | "json" => parse_config(&raw, ext),
        _ => Err(ConfigError::unsupported_format(path)),
    }
}

/// Parse an already-read config document.
pub fn parse_config(raw: &str, ext: &str) -> Result<CometConfig> {
    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(ConfigError::message(format!(
            "unsupported config format: .{other}"
        ))),
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./comet.{toml,json}` (project-local)
/// 2. `~/.config/comet/comet.{toml,json}` (user-global)
///
/// Returns `CometConfig::default()` if no config file is found or it fails to load.
pub fn discover_and_load() -> CometConfig {
    match find_config_file() {
        Some(path) => load_or_default(&path),
        None => {
            debug!("no config file found, using defaults");
            CometConfig::default()
        },
    }
}

fn load_or_default(path: &Path) -> CometConfig {
    debug!(path = %path.display(), "loading config");
    load_config(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        CometConfig::default()
    })
}

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/comet/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "comet").map(|d| d.config_dir().to_path_buf())
}
