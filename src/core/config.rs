//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the project-level config file
pub const PROJECT_CONFIG_FILE: &str = ".dint.yaml";

/// dint configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `*.tera` files that override or add templates
    pub templates_dir: Option<PathBuf>,

    /// Extra catalog files to load on top of the built-in spaces
    pub spaces: Vec<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Log filter used when no verbosity flag is given (e.g. "debug")
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dint/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_layer(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.dint.yaml in cwd or a parent)
        if let Some(project_path) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover(&cwd))
        {
            if let Some(project) = Self::read_layer(&project_path) {
                config.merge(project);
            }
        }

        // 4. Environment variables
        config.apply_env();
        config
    }

    /// Load a single explicit config file, then apply the environment
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse one config file; relative paths are resolved against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Find the nearest project config walking up from `start`
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dint")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read an optional layer; a broken layer is reported and skipped
    fn read_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::from_file(path) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config layer");
                Some(config)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("DINT_TEMPLATES_DIR") {
            self.templates_dir = Some(PathBuf::from(dir));
        }
        if let Ok(format) = std::env::var("DINT_FORMAT") {
            self.default_format = Some(format);
        }
        if let Ok(level) = std::env::var("DINT_LOG") {
            self.log_level = Some(level);
        }
    }

    fn resolve_relative(&mut self, base: &Path) {
        if let Some(dir) = self.templates_dir.take() {
            self.templates_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        for space in &mut self.spaces {
            if space.is_relative() {
                *space = base.join(&*space);
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    ///
    /// Catalog files accumulate across layers.
    pub fn merge(&mut self, other: Config) {
        if other.templates_dir.is_some() {
            self.templates_dir = other.templates_dir;
        }
        self.spaces.extend(other.spaces);
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }
}

/// Errors reading an explicit config file
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    #[diagnostic(code(dint::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    #[diagnostic(
        code(dint::config::parse),
        help("Valid keys are templates_dir, spaces, default_format and log_level.")
    )]
    Parse { path: PathBuf, message: String },
}
