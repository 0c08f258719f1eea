//! Network and build-mode selection.

use std::fmt;

/// The build environment, as given by the build-mode flag (`NODE_ENV`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BuildMode {
    Production,
    #[default]
    Development,
    Other(String),
}

impl BuildMode {
    /// Parse a build-mode flag. Only `"production"` selects production; an
    /// unset flag means development.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("production") => BuildMode::Production,
            Some("development") | None => BuildMode::Development,
            Some(other) => BuildMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuildMode::Production => "production",
            BuildMode::Development => "development",
            BuildMode::Other(s) => s,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployment target whose identifiers are exported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Network(String);

impl Network {
    pub const LOCAL: &'static str = "local";
    pub const IC: &'static str = "ic";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Pick the effective network.
    ///
    /// A non-empty override wins; otherwise production builds target `ic`
    /// and every other mode targets `local`.
    pub fn select(network_override: Option<&str>, mode: &BuildMode) -> Self {
        match network_override {
            Some(name) if !name.is_empty() => Self::new(name),
            _ if mode.is_production() => Self::new(Self::IC),
            _ => Self::new(Self::LOCAL),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local networks read `.dfx/local/canister_ids.json`; all others read the
    /// production file.
    pub fn is_local(&self) -> bool {
        self.0 == Self::LOCAL
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_from_flag() {
        assert_eq!(BuildMode::from_flag(Some("production")), BuildMode::Production);
        assert_eq!(BuildMode::from_flag(None), BuildMode::Development);
        assert_eq!(
            BuildMode::from_flag(Some("development")),
            BuildMode::Development
        );
        assert_eq!(
            BuildMode::from_flag(Some("test")),
            BuildMode::Other("test".into())
        );
        // Case matters, as it does for NODE_ENV checks.
        assert!(!BuildMode::from_flag(Some("Production")).is_production());
    }

    #[test]
    fn test_select_defaults_by_mode() {
        assert_eq!(Network::select(None, &BuildMode::Production).as_str(), "ic");
        assert_eq!(
            Network::select(None, &BuildMode::Development).as_str(),
            "local"
        );
        assert_eq!(
            Network::select(None, &BuildMode::Other("staging".into())).as_str(),
            "local"
        );
    }

    #[test]
    fn test_select_override_wins() {
        let net = Network::select(Some("local"), &BuildMode::Production);
        assert!(net.is_local());

        let net = Network::select(Some("testnet"), &BuildMode::Development);
        assert_eq!(net.as_str(), "testnet");
        assert!(!net.is_local());
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let net = Network::select(Some(""), &BuildMode::Production);
        assert_eq!(net.as_str(), "ic");
    }
}
