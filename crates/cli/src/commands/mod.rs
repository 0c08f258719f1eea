//! Subcommand implementations.
//!
//! Every command works from a [`Session`]: the loaded configuration plus the
//! `--network` / `--mode` flags given on the command line.

pub mod check;
pub mod exec;
pub mod init;
pub mod list;
pub mod resolve;
pub mod style;
pub mod validate;

use std::path::PathBuf;

use canister_env_core::build_env::BuildEnvironment;
use canister_env_core::config::AppConfig;
use canister_env_core::resolver::{ResolveOptions, ResolvedEnvironment};

/// Configuration plus command-line overrides for one invocation.
pub struct Session {
    pub config: AppConfig,
    /// Where the configuration came from, `None` when running on defaults.
    pub config_path: Option<PathBuf>,
    pub network: Option<String>,
    pub mode: Option<String>,
}

impl Session {
    /// Look up a variable, letting `--network` and `--mode` shadow the
    /// configured network and mode variables.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let env = &self.config.environment;
        if name == env.network_var {
            if let Some(network) = &self.network {
                return Some(network.clone());
            }
        }
        if name == env.mode_var {
            if let Some(mode) = &self.mode {
                return Some(mode.clone());
            }
        }
        std::env::var(name).ok()
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::from_config(&self.config.sources, &self.config.environment, |name| {
            self.lookup(name)
        })
    }

    /// Defaults, then resolved ids, then whatever the environment already
    /// sets.
    pub fn build_environment(&self, resolved: &ResolvedEnvironment) -> BuildEnvironment {
        BuildEnvironment::new(&self.config.build.defaults)
            .merge_resolved(resolved)
            .apply_overrides(|name| self.lookup(name))
    }
}
