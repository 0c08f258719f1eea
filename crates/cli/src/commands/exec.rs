//! Run a command with the build environment injected.

use std::process::{Command, ExitCode};

use anyhow::{Context, Result};
use tracing::{debug, info};

use canister_env_core::diagnostics::TracingSink;
use canister_env_core::resolver::resolve;

use super::Session;

/// Spawn `command` with the merged build environment and return its exit
/// status.
pub fn run_exec(session: &Session, command: &[String]) -> Result<ExitCode> {
    let (program, args) = command
        .split_first()
        .context("no command given to exec")?;

    let resolved = resolve(&session.resolve_options(), &TracingSink);
    let build = session.build_environment(&resolved);
    let vars = build.vars();

    info!(program = %program, vars = vars.len(), "running command with canister environment");
    for key in vars.keys() {
        debug!(key = %key, "injecting variable");
    }

    let status = Command::new(program)
        .args(args)
        .envs(&vars)
        .status()
        .with_context(|| format!("failed to run '{}'", program))?;

    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        // Terminated by a signal.
        None => ExitCode::FAILURE,
    })
}
