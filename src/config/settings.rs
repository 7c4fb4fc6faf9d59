//! LangM Settings and Configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::{LangmError, Result, paths};

/// LangM configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Allow coloured output (`NO_COLOR` and `--no-color` still win)
    pub color: bool,

    /// Default tracing filter when `LANGM_LOG` is not set
    pub log_level: String,

    /// Rows shown at once by the runtime selector
    pub prompt_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            log_level: "warn".to_string(),
            prompt_page_size: 10,
        }
    }
}

impl Settings {
    /// Load settings from the settings file, defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let settings: Self = toml::from_str(&content).map_err(|e| LangmError::Settings {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        if settings.prompt_page_size == 0 {
            return Err(LangmError::Settings {
                path: path.to_path_buf(),
                message: "prompt_page_size must be at least 1".to_string(),
            });
        }
        Ok(settings)
    }

    /// Get the settings file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::settings_path()
    }
}
