//! Error types for the canister-env core library.
//!
//! Each subsystem has its own error type derived with `thiserror`. Resolution
//! itself never fails; these errors only surface from the strict mapping
//! loader, configuration handling, and output rendering.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Mapping file errors
// ---------------------------------------------------------------------------

/// Errors from reading a `canister_ids.json` mapping file.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The file does not exist.
    #[error("canister id file not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("failed to read canister id file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a `{name: {network: id}}` JSON document.
    #[error("malformed canister id file '{path}': {detail}")]
    Parse {
        path: String,
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors from rendering resolved variables.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The requested output format is unknown.
    #[error("unknown output format '{0}' (expected dotenv, json, or shell)")]
    UnknownFormat(String),

    /// A variable name cannot be exported from a POSIX shell.
    #[error("'{0}' is not a valid shell variable name")]
    InvalidShellName(String),

    /// JSON serialization failed.
    #[error("failed to serialize variables as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
