//! Shared filesystem paths with test-friendly overrides.

use std::path::PathBuf;

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn fallback_home_dir() -> PathBuf {
    home::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// LangM state directory (default: ~/.langm).
#[must_use]
pub fn langm_dir() -> PathBuf {
    env_path("LANGM_HOME").unwrap_or_else(|| fallback_home_dir().join(".langm"))
}

/// Registry document path (default: ~/.langm/config.json).
#[must_use]
pub fn config_path() -> PathBuf {
    langm_dir().join("config.json")
}

/// Active link path (default: ~/.langm/current).
#[must_use]
pub fn current_link_path() -> PathBuf {
    langm_dir().join("current")
}

/// Settings file path (default: ~/.langm/settings.toml).
#[must_use]
pub fn settings_path() -> PathBuf {
    env_path("LANGM_SETTINGS").unwrap_or_else(|| langm_dir().join("settings.toml"))
}
