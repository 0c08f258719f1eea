//! Health check for a project's canister id setup.

use anyhow::Result;

use canister_env_core::diagnostics::{Diagnostic, Level, RecordingSink};
use canister_env_core::mapping::Source;
use canister_env_core::resolver::resolve;

use super::{style, Session};

/// Resolve with a recording sink and print what was found.
///
/// Returns `true` when any warning or error was recorded.
pub fn run_check(session: &Session) -> Result<bool> {
    println!();
    println!("{}", style::header("Canister Env Check"));
    println!("{}", "═".repeat(18));
    println!();

    match &session.config_path {
        Some(path) => println!(
            "  {}",
            style::success(&format!("Configuration  {}", path.display()))
        ),
        None => println!("  {}", style::dim("Configuration  defaults (no config file)")),
    }

    let options = session.resolve_options();
    let sink = RecordingSink::new();
    let resolved = resolve(&options, &sink);

    let mut issues = Vec::new();

    for diagnostic in sink.diagnostics() {
        match &diagnostic {
            Diagnostic::CheckingSource { .. } => {}
            Diagnostic::SourceLoaded {
                source,
                path,
                entries,
            } => println!(
                "  {}",
                style::success(&format!(
                    "{:<14} {} ({} canisters)",
                    source_label(*source),
                    path.display(),
                    entries
                ))
            ),
            Diagnostic::SourceUnavailable { source, path, .. } => {
                println!(
                    "  {}",
                    style::warn(&format!(
                        "{:<14} {} (unavailable)",
                        source_label(*source),
                        path.display()
                    ))
                );
                issues.push(match source {
                    Source::Local => "Run 'dfx deploy' against a local replica".to_string(),
                    Source::Production => {
                        "Run 'dfx deploy --network ic' to create canister_ids.json".to_string()
                    }
                });
            }
            Diagnostic::NetworkSelected { network } => println!(
                "  {}",
                style::success(&format!("Network        {} (mode {})", network, options.mode))
            ),
            Diagnostic::EmptyConfig { network } => {
                println!(
                    "  {}",
                    style::error(&format!("Canisters      none for network '{}'", network))
                );
                issues.push(format!("Deploy canisters to network '{}'", network));
            }
            Diagnostic::MissingIdentifier { name, network } => {
                println!(
                    "  {}",
                    style::warn(&format!("Canister       {} has no '{}' id", name, network))
                );
                issues.push(format!("Deploy '{}' to network '{}'", name, network));
            }
            Diagnostic::KeyCollision { key, kept, dropped } => {
                println!(
                    "  {}",
                    style::warn(&format!("Variable       {} set by both '{}' and '{}'", key, dropped, kept))
                );
                issues.push(format!("Rename '{}' or '{}' so their variables differ", dropped, kept));
            }
        }
    }

    let missing = resolved.missing().count();
    if !resolved.is_empty() {
        println!();
        println!("  {}", style::header("Variables"));
        for (key, value) in resolved.iter() {
            println!("    {}", style::variable(key, value));
        }
    }
    println!();
    println!(
        "  {} variable(s) resolved, {} missing",
        resolved.len(),
        missing
    );

    let problems = sink.count(Level::Warn) + sink.count(Level::Error);
    println!();
    if problems == 0 {
        println!("{}", style::success("All checks passed."));
    } else {
        println!("{}", style::header("Suggested fixes:"));
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. {}", i + 1, issue);
        }
    }
    println!();

    Ok(problems > 0)
}

fn source_label(source: Source) -> &'static str {
    match source {
        Source::Local => "Local ids",
        Source::Production => "Production ids",
    }
}
