//! Print resolved canister id variables.

use std::path::Path;

use anyhow::{Context, Result};

use canister_env_core::diagnostics::TracingSink;
use canister_env_core::output::{render, OutputFormat};
use canister_env_core::resolver::resolve;

use super::Session;

/// Resolve and render the variables to stdout or `output`.
///
/// With `all`, the full build environment (defaults and process overrides
/// included) is rendered instead of just the canister ids.
pub fn run_resolve(
    session: &Session,
    format: Option<OutputFormat>,
    output: Option<&Path>,
    all: bool,
) -> Result<()> {
    let resolved = resolve(&session.resolve_options(), &TracingSink);
    let vars = if all {
        session.build_environment(&resolved).vars()
    } else {
        resolved.into_inner()
    };

    let format = format.unwrap_or(session.config.output.format);
    let rendered = render(&vars, format).context("failed to render variables")?;

    match output.or(session.config.output.path.as_deref()) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), count = vars.len(), %format, "wrote variables");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::commands::testing::project_session;

    #[test]
    fn test_resolve_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = project_session(
            dir.path(),
            r#"{"ledger": {"local": "abc123"}, "nft": {"ic": "xyz789"}}"#,
        );
        let out = dir.path().join("dist").join(".env");

        run_resolve(&session, Some(OutputFormat::Dotenv), Some(&out), false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "LEDGER_CANISTER_ID=abc123\nNFT_CANISTER_ID=MISSING_CANISTER_ID\n"
        );
    }

    #[test]
    fn test_resolve_all_includes_build_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let session = project_session(dir.path(), r#"{"ledger": {"local": "abc123"}}"#);
        let out = dir.path().join("env.json");

        run_resolve(&session, Some(OutputFormat::Json), Some(&out), true).unwrap();

        let vars: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(vars["LEDGER_CANISTER_ID"], "abc123");
        assert_eq!(vars["CANISTER_ENV_TEST_DEFAULT"], "on");
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_resolve_uses_configured_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = project_session(dir.path(), r#"{"ledger": {"local": "abc123"}}"#);
        let out = dir.path().join("configured.sh");
        session.config.output.format = OutputFormat::Shell;
        session.config.output.path = Some(out.clone());

        run_resolve(&session, None, None, false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "export LEDGER_CANISTER_ID='abc123'\n"
        );
    }

    #[test]
    fn test_resolve_shell_rejects_invalid_name() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            project_session(dir.path(), r#"{"internet-identity": {"local": "rdmx6"}}"#);
        let out = dir.path().join("env.sh");

        let result = run_resolve(&session, Some(OutputFormat::Shell), Some(&out), false);
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
