use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "homework.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Homework file, relative to the working directory unless absolute.
    pub data_file: PathBuf,
    /// Diagnostic log. Defaults to the user cache directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_file: default_log_path(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {}", path.display()))?;
                Self::from_toml(&contents)?
            }
            _ => Self::default(),
        };

        if let Ok(file) = std::env::var("HOMEWORK_FILE") {
            if !file.trim().is_empty() {
                config.data_file = PathBuf::from(file);
            }
        }

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "Failed to parse config.toml")
    }

    pub fn generate_default() -> Result<PathBuf> {
        let path = Self::config_path()
            .with_context(|| "Could not determine config directory")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&Config::default())?;
        std::fs::write(&path, toml_str)?;
        Ok(path)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("homework-tui").join("config.toml"))
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("homework-tui").join("homework-tui.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.log_file, default_log_path());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            "data_file = \"/tmp/hw.txt\"\nlog_file = \"/tmp/hw.log\"\n",
        )
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/hw.txt"));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/hw.log")));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(Config::from_toml("data_file = ").is_err());
    }

    #[test]
    fn test_default_serializes_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }
}
