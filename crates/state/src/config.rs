use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "plan-editor.toml";
pub const HISTORY_SIZE_ENV: &str = "PLAN_UNDO_HISTORY_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of history entries. `0` turns undo/redo off.
    pub history_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub undo: HistoryConfig,
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path` if it exists, then applies the environment override.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };
        config.with_history_size_override(std::env::var(HISTORY_SIZE_ENV).ok().as_deref())
    }

    pub fn with_history_size_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = raw else {
            return Ok(self);
        };
        self.undo.history_size = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: HISTORY_SIZE_ENV,
            value: raw.to_string(),
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_disabled_by_default() {
        assert_eq!(AppConfig::default().undo.history_size, 0);
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_history_size() {
        let config = AppConfig::from_toml_str("[undo]\nhistory_size = 25\n").unwrap();
        assert_eq!(config.undo.history_size, 25);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[undo]\nhistory_size = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_override_wins() {
        let config = AppConfig::default()
            .with_history_size_override(Some(" 7 "))
            .unwrap();
        assert_eq!(config.undo.history_size, 7);

        let err = AppConfig::default()
            .with_history_size_override(Some("lots"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        assert!(AppConfig::load(Path::new("/nonexistent/plan-editor.toml")).is_ok());
    }
}
