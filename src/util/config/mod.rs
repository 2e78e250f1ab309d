//! Checker configuration
//!
//! Supports project-level configuration with environment overrides.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. Environment variables (NG_PATH)
//! 3. Project-level (ng.toml, nearest ancestor directory)
//! 4. Default values
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use neugram::util::config::load_project_config;
//!
//! let config = load_project_config(std::path::Path::new(".")).unwrap();
//! assert!(config.is_native_import("lib.ng"));
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "ng.toml";

/// Environment variable holding extra native import search paths
pub const PATH_ENV: &str = "NG_PATH";

/// Front end configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Extra directories searched for native imports
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    /// File extensions that mark an import path as native
    #[serde(default = "default_extensions")]
    pub native_extensions: Vec<String>,
    /// Default log level for the CLI
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_extensions() -> Vec<String> {
    vec![".ng".to_string()]
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            native_extensions: default_extensions(),
            log_level: LogLevel::default(),
        }
    }
}

impl CheckerConfig {
    /// Check whether an import path names a native source file
    pub fn is_native_import(
        &self,
        path: &str,
    ) -> bool {
        self.native_extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    /// Append the search paths listed in `NG_PATH`
    pub fn with_env(mut self) -> Self {
        if let Some(paths) = std::env::var_os(PATH_ENV) {
            self.search_paths.extend(std::env::split_paths(&paths));
        }
        self
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::ParseError)
    }
}

/// Find the nearest `ng.toml` at or above `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|d| d.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load project-level configuration
///
/// Returns the default config if no `ng.toml` is found. Relative search
/// paths are resolved against the directory holding the config file.
pub fn load_project_config(dir: &Path) -> Result<CheckerConfig, ConfigError> {
    let path = match find_config_file(dir) {
        Some(p) => p,
        None => return Ok(CheckerConfig::default().with_env()),
    };

    let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError(path.clone(), e))?;
    let mut config = CheckerConfig::from_toml(&content)?;
    if let Some(base) = path.parent() {
        for search in config.search_paths.iter_mut() {
            if search.is_relative() {
                *search = base.join(&*search);
            }
        }
    }
    Ok(config.with_env())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}
