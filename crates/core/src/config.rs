//! TOML-based configuration for canister-env.
//!
//! Every field has a default matching a stock dfx project layout, so the
//! configuration file is optional. See [`AppConfig::load_or_default`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::output::OutputFormat;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "canister-env.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Locations of the two canister id files.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Names of the flags that select network and build mode.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Build environment defaults.
    #[serde(default)]
    pub build: BuildConfig,

    /// Output rendering.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Paths to the local and production canister id files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcesConfig {
    /// Written by `dfx deploy` against a local replica.
    #[serde(default = "default_local_path")]
    pub local: PathBuf,

    /// Written by `dfx deploy --network ic`.
    #[serde(default = "default_production_path")]
    pub production: PathBuf,
}

fn default_local_path() -> PathBuf {
    Path::new(".dfx").join("local").join("canister_ids.json")
}
fn default_production_path() -> PathBuf {
    PathBuf::from("canister_ids.json")
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            local: default_local_path(),
            production: default_production_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment flags
// ---------------------------------------------------------------------------

/// Which process environment variables carry the network and mode flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    #[serde(default = "default_network_var")]
    pub network_var: String,

    #[serde(default = "default_mode_var")]
    pub mode_var: String,
}

fn default_network_var() -> String {
    "DFX_NETWORK".into()
}
fn default_mode_var() -> String {
    "NODE_ENV".into()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            network_var: default_network_var(),
            mode_var: default_mode_var(),
        }
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Variables injected into the build alongside the resolved canister ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Default values; a variable already set in the process environment
    /// takes precedence.
    #[serde(default = "default_build_defaults")]
    pub defaults: BTreeMap<String, String>,
}

fn default_build_defaults() -> BTreeMap<String, String> {
    BTreeMap::from([("NODE_ENV".to_string(), "development".to_string())])
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            defaults: default_build_defaults(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Like [`load_from_file`](Self::load_from_file), but a missing file
    /// yields the defaults. Parse errors still propagate.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_from_file(path.as_ref()) {
            Err(ConfigError::FileNotFound(p)) => {
                debug!(path = %p, "no configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate that all fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.local.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sources.local".into(),
                detail: "path must not be empty".into(),
            });
        }
        if self.sources.production.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sources.production".into(),
                detail: "path must not be empty".into(),
            });
        }
        if self.environment.network_var.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "environment.network_var".into(),
                detail: "variable name must not be empty".into(),
            });
        }
        if self.environment.mode_var.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "environment.mode_var".into(),
                detail: "variable name must not be empty".into(),
            });
        }
        if let Some(key) = self.build.defaults.keys().find(|k| k.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: format!("build.defaults.{key}"),
                detail: "variable name must not be empty".into(),
            });
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }
}
