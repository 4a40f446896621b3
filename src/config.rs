//! Application Configuration
//!
//! JSON file with environment overrides. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const APP_DIR: &str = "shopping-list";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_URL: &str = "http://localhost:3000/shoppingLists";
pub const DEFAULT_USER: &str = "you";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Collection URL of the list store
    pub api_url: String,
    /// Identity used for ownership and membership checks
    pub current_user: String,
    /// Where the local mirror lives, defaults to the platform data dir
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    /// Serve lists from the bundled mock data instead of the REST store
    pub use_mock: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            current_user: DEFAULT_USER.to_string(),
            data_dir: None,
            log_dir: None,
            use_mock: false,
        }
    }
}

impl AppConfig {
    /// `<config dir>/shopping-list/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| DomainError::Config(format!("parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Config(format!("create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| DomainError::Config(format!("write {}: {}", path.display(), e)))
    }

    /// Apply `SHOPPING_LIST_API_URL`, `SHOPPING_LIST_USER` and `USE_MOCK`
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("SHOPPING_LIST_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(user) = lookup("SHOPPING_LIST_USER").filter(|v| !v.trim().is_empty()) {
            self.current_user = user;
        }
        if let Some(mock) = lookup("USE_MOCK") {
            self.use_mock = mock == "true";
        }
        self
    }

    pub fn from_env(self) -> Self {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.current_user, "you");
    }

    #[test]
    fn test_partial_file_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "current_user": "Jane" }"#).unwrap();

        let mut config = AppConfig::load(&path).unwrap();
        assert_eq!(config.current_user, "Jane");
        assert_eq!(config.api_url, DEFAULT_API_URL);

        config.use_mock = true;
        config.save(&path).unwrap();
        assert!(AppConfig::load(&path).unwrap().use_mock);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SHOPPING_LIST_API_URL", "http://example.test/lists"),
            ("SHOPPING_LIST_USER", ""),
            ("USE_MOCK", "true"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default().with_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_url, "http://example.test/lists");
        assert_eq!(config.current_user, DEFAULT_USER);
        assert!(config.use_mock);
    }

    #[test]
    fn test_log_dir_defaults_under_data_dir() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/lists")),
            ..Default::default()
        };
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/lists/logs"));
    }
}
