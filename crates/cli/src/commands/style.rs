//! Shared styling utilities for CLI reports.

use console::Style;

use canister_env_core::resolver::MISSING_CANISTER_ID;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Render `KEY=value`, flagging the missing-id sentinel in red.
pub fn variable(key: &str, value: &str) -> String {
    let key = Style::new().cyan().apply_to(key);
    if value == MISSING_CANISTER_ID {
        format!("{}={}", key, Style::new().red().bold().apply_to(value))
    } else {
        format!("{}={}", key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_text() {
        let plain = console::strip_ansi_codes(&variable("LEDGER_CANISTER_ID", "abc123")).to_string();
        assert_eq!(plain, "LEDGER_CANISTER_ID=abc123");

        let plain =
            console::strip_ansi_codes(&variable("NFT_CANISTER_ID", MISSING_CANISTER_ID)).to_string();
        assert_eq!(plain, "NFT_CANISTER_ID=MISSING_CANISTER_ID");
    }

    #[test]
    fn test_missing_id_styled_differently() {
        console::set_colors_enabled(true);
        let ok = variable("A", "abc123");
        let missing = variable("A", MISSING_CANISTER_ID);
        assert!(!ok.contains("\u{1b}[31m"));
        assert!(missing.contains("\u{1b}[31m"));
    }
}
