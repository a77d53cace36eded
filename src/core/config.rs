//! Configuration loading
//!
//! Layers, lowest to highest priority: built-in defaults, the user config file
//! (`<config_dir>/invcat/config.yaml`), then `INVCAT_*` environment variables.
//! Command-line flags are applied on top by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::error::{CatalogError, Result};
use crate::core::store::IN_MEMORY;

/// Environment variable overriding the database path
pub const ENV_DB: &str = "INVCAT_DB";

/// Environment variable overriding the default output format
pub const ENV_FORMAT: &str = "INVCAT_FORMAT";

const DB_FILE: &str = "catalog.db";
const CONFIG_FILE: &str = "config.yaml";

/// Catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database, or `:memory:`
    pub database: Option<PathBuf>,

    /// Default output format name (auto, table, tsv, json, yaml, id)
    pub format: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "invcat")
}

impl Config {
    /// Load configuration from the user config file and environment
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Location of the user config file, if the platform has a config directory
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            CatalogError::Config { message } => CatalogError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(content).map_err(|e| CatalogError::Config {
            message: e.to_string(),
        })
    }

    /// Overlay values from the environment, read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.trim().is_empty()) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(format) = lookup(ENV_FORMAT).filter(|v| !v.trim().is_empty()) {
            self.format = Some(format.trim().to_lowercase());
        }
    }

    /// The database to open: configured path, else the per-user data directory
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.database {
            return path.clone();
        }
        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DB_FILE),
            None => PathBuf::from(DB_FILE),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database
            .as_deref()
            .is_some_and(|p| p.as_os_str() == IN_MEMORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml() {
        let config = Config::from_yaml_str("database: /tmp/shop.db\nformat: json\n").unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = Config::from_yaml_str("database: [unclosed").unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));

        let err = Config::from_yaml_str("colour: blue\n").unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn test_from_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "format: [").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_yaml_str("database: a.db\nformat: yaml\n").unwrap();
        let env: HashMap<&str, &str> = [(ENV_DB, "b.db"), (ENV_FORMAT, " JSON ")].into();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("b.db"));
        assert_eq!(config.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut config = Config::from_yaml_str("database: a.db\n").unwrap();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.database_path(), PathBuf::from("a.db"));
    }

    #[test]
    fn test_in_memory() {
        let config = Config::from_yaml_str("database: ':memory:'\n").unwrap();
        assert!(config.is_in_memory());
        assert!(!Config::default().is_in_memory());
    }
}
