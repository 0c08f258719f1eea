//! canister-env command-line tool.
//!
//! Resolves dfx canister ids into `<NAME>_CANISTER_ID` variables and hands
//! them to a frontend build, either as rendered output or by running the
//! build command with the variables injected.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use canister_env_core::config::{AppConfig, DEFAULT_CONFIG_FILE};
use canister_env_core::output::OutputFormat;

use commands::Session;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Derive canister id environment variables for a frontend build.
#[derive(Parser, Debug)]
#[command(
    name = "canister-env",
    version,
    about = "Export dfx canister ids as build environment variables"
)]
struct Cli {
    /// Path to the TOML configuration file (optional).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Network to export ids for, overriding the network variable.
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Build mode, overriding the mode variable (e.g. production).
    #[arg(short, long, global = true)]
    mode: Option<String>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved canister id variables.
    Resolve {
        /// Output format: dotenv, json, or shell.
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include build defaults such as NODE_ENV.
        #[arg(long)]
        all: bool,
    },

    /// Run a command with the build environment injected.
    Exec {
        /// Command and arguments, e.g. `-- npm run build`.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show every canister id in the local and production files.
    List,

    /// Check the canister id setup and suggest fixes.
    Check {
        /// Exit with failure on any warning.
        #[arg(long)]
        strict: bool,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// Validate the configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Init { ref output } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"));
            commands::init::run_init(output)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Validate => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"));
            commands::validate::run_validate(&cli.config)?;
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let session = load_session(&cli)?;

    match cli.command {
        Commands::Resolve {
            format,
            ref output,
            all,
        } => commands::resolve::run_resolve(&session, format, output.as_deref(), all)?,
        Commands::Exec { ref command } => return commands::exec::run_exec(&session, command),
        Commands::List => commands::list::run_list(&session)?,
        Commands::Check { strict } => {
            let has_issues = commands::check::run_check(&session)?;
            if strict && has_issues {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Init { .. } | Commands::Validate => unreachable!(),
    }

    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn load_session(cli: &Cli) -> Result<Session> {
    let config_exists = cli.config.exists();
    let config =
        AppConfig::load_or_default(&cli.config).context("failed to load configuration file")?;

    init_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));

    config.validate().context("invalid configuration")?;
    if config_exists {
        info!(path = %cli.config.display(), "loaded configuration");
    } else {
        debug!(path = %cli.config.display(), "no configuration file, using defaults");
    }

    Ok(Session {
        config,
        config_path: config_exists.then(|| cli.config.clone()),
        network: cli.network.clone(),
        mode: cli.mode.clone(),
    })
}

/// Install the stderr subscriber; stdout is reserved for rendered output.
///
/// Runs after the configuration is read, so the configured level applies. A
/// subscriber that is already installed is left in place.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
