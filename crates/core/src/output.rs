//! Rendering of variables as dotenv, JSON, or shell exports.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::OutputError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `KEY=value` lines.
    #[default]
    Dotenv,
    /// A single JSON object.
    Json,
    /// `export KEY='value'` lines for `eval`.
    Shell,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dotenv" | "env" => Ok(OutputFormat::Dotenv),
            "json" => Ok(OutputFormat::Json),
            "shell" | "sh" => Ok(OutputFormat::Shell),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Dotenv => f.write_str("dotenv"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Shell => f.write_str("shell"),
        }
    }
}

/// Render `vars` in the given format. Output ends with a newline unless it
/// is empty.
pub fn render(vars: &BTreeMap<String, String>, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Dotenv => Ok(vars
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, dotenv_value(v)))
            .collect()),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(vars)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Shell => {
            let mut out = String::new();
            for (k, v) in vars {
                if !is_shell_name(k) {
                    return Err(OutputError::InvalidShellName(k.clone()));
                }
                out.push_str(&format!("export {}={}\n", k, shell_quote(v)));
            }
            Ok(out)
        }
    }
}

fn dotenv_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn is_shell_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
