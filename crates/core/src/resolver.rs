//! Canister id resolution.
//!
//! [`resolve`] reads the local and production `canister_ids.json` files,
//! picks the effective network, and derives one `<NAME>_CANISTER_ID`
//! variable per canister. The derivation itself is the pure
//! [`derive_environment`], which never touches the filesystem.
//!
//! Resolution never fails. Missing or malformed files, an empty selection,
//! and canisters without an id for the network are all reported through the
//! [`DiagnosticSink`] and degrade to an empty or sentinel value.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{EnvironmentConfig, SourcesConfig};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::mapping::{IdentifierMapping, MappingFile, Source};
use crate::network::{BuildMode, Network};

/// Appended to the uppercased canister name to form the variable name.
pub const KEY_SUFFIX: &str = "_CANISTER_ID";

/// Value exported for a canister that has no id on the selected network.
pub const MISSING_CANISTER_ID: &str = "MISSING_CANISTER_ID";

/// Variable name for a canister: `ledger` -> `LEDGER_CANISTER_ID`.
pub fn env_key(name: &str) -> String {
    format!("{}{}", name.to_uppercase(), KEY_SUFFIX)
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Resolved `<NAME>_CANISTER_ID` variables, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    vars: BTreeMap<String, String>,
}

impl ResolvedEnvironment {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Keys whose value is [`MISSING_CANISTER_ID`].
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, v)| *v == MISSING_CANISTER_ID)
            .map(|(k, _)| k)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.vars
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything [`resolve`] needs: the two file paths plus the network and
/// build-mode flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub local_path: PathBuf,
    pub prod_path: PathBuf,
    pub network_override: Option<String>,
    pub mode: BuildMode,
}

impl ResolveOptions {
    pub fn new(local_path: impl Into<PathBuf>, prod_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            prod_path: prod_path.into(),
            network_override: None,
            mode: BuildMode::default(),
        }
    }

    pub fn with_network_override(mut self, network: Option<String>) -> Self {
        self.network_override = network;
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build options from configuration, reading the network and mode flags
    /// through `lookup` (normally `std::env::var`).
    pub fn from_config<F>(sources: &SourcesConfig, environment: &EnvironmentConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = BuildMode::from_flag(lookup(&environment.mode_var).as_deref());
        Self::new(&sources.local, &sources.production)
            .with_network_override(lookup(&environment.network_var))
            .with_mode(mode)
    }

    /// The network these options select.
    pub fn network(&self) -> Network {
        Network::select(self.network_override.as_deref(), &self.mode)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Read both canister id files and derive the variables for the effective
/// network.
pub fn resolve(options: &ResolveOptions, sink: &dyn DiagnosticSink) -> ResolvedEnvironment {
    let local = MappingFile::load_or_empty(Source::Local, &options.local_path, sink);
    let prod = MappingFile::load_or_empty(Source::Production, &options.prod_path, sink);

    let network = options.network();
    sink.emit(Diagnostic::NetworkSelected {
        network: network.to_string(),
    });

    derive_environment(&local, &prod, &network, sink)
}

/// Derive `<NAME>_CANISTER_ID` variables from already-loaded mappings.
///
/// Only the local mapping is consulted for the `local` network and only the
/// production mapping otherwise. An empty identifier counts as missing.
pub fn derive_environment(
    local: &IdentifierMapping,
    prod: &IdentifierMapping,
    network: &Network,
    sink: &dyn DiagnosticSink,
) -> ResolvedEnvironment {
    let selected = if network.is_local() { local } else { prod };

    if selected.is_empty() {
        sink.emit(Diagnostic::EmptyConfig {
            network: network.to_string(),
        });
        return ResolvedEnvironment::default();
    }

    let mut vars = BTreeMap::new();
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();

    for (name, entry) in selected {
        let value = match entry.get(network.as_str()) {
            Some(id) if !id.is_empty() => id.clone(),
            _ => {
                sink.emit(Diagnostic::MissingIdentifier {
                    name: name.clone(),
                    network: network.to_string(),
                });
                MISSING_CANISTER_ID.to_string()
            }
        };

        let key = env_key(name);
        if let Some(previous) = owners.insert(key.clone(), name) {
            sink.emit(Diagnostic::KeyCollision {
                key: key.clone(),
                kept: name.clone(),
                dropped: previous.to_string(),
            });
        }
        vars.insert(key, value);
    }

    ResolvedEnvironment { vars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, RecordingSink};
    use crate::mapping::NetworkEntry;

    fn mapping(entries: &[(&str, &[(&str, &str)])]) -> IdentifierMapping {
        entries
            .iter()
            .map(|(name, nets)| {
                let entry: NetworkEntry = nets
                    .iter()
                    .map(|(n, id)| (n.to_string(), id.to_string()))
                    .collect();
                (name.to_string(), entry)
            })
            .collect()
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("ledger"), "LEDGER_CANISTER_ID");
        assert_eq!(env_key("opend_assets"), "OPEND_ASSETS_CANISTER_ID");
        assert_eq!(
            env_key("internet-identity"),
            "INTERNET-IDENTITY_CANISTER_ID"
        );
    }

    #[test]
    fn test_derive_local() {
        let local = mapping(&[("ledger", &[("local", "abc123")])]);
        let sink = RecordingSink::new();

        let env = derive_environment(
            &local,
            &IdentifierMapping::new(),
            &Network::new("local"),
            &sink,
        );
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some("abc123"));
        assert_eq!(sink.count(Level::Warn), 0);
    }

    #[test]
    fn test_derive_missing_network_uses_sentinel() {
        let local = mapping(&[("ledger", &[("ic", "xyz789")])]);
        let sink = RecordingSink::new();

        let env = derive_environment(
            &local,
            &IdentifierMapping::new(),
            &Network::new("local"),
            &sink,
        );
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some(MISSING_CANISTER_ID));
        assert_eq!(env.missing().collect::<Vec<_>>(), vec!["LEDGER_CANISTER_ID"]);
        assert_eq!(
            sink.diagnostics(),
            vec![Diagnostic::MissingIdentifier {
                name: "ledger".into(),
                network: "local".into(),
            }]
        );
    }

    #[test]
    fn test_derive_empty_identifier_is_missing() {
        let prod = mapping(&[("ledger", &[("ic", "")])]);
        let env = derive_environment(
            &IdentifierMapping::new(),
            &prod,
            &Network::new("ic"),
            &RecordingSink::new(),
        );
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some(MISSING_CANISTER_ID));
    }

    #[test]
    fn test_local_network_ignores_production() {
        let prod = mapping(&[("ledger", &[("local", "from-prod"), ("ic", "xyz789")])]);
        let sink = RecordingSink::new();

        let env = derive_environment(
            &IdentifierMapping::new(),
            &prod,
            &Network::new("local"),
            &sink,
        );
        assert!(env.is_empty());
        assert_eq!(sink.count(Level::Error), 1);
    }

    #[test]
    fn test_non_local_network_reads_production() {
        let local = mapping(&[("ledger", &[("ic", "from-local")])]);
        let prod = mapping(&[
            ("ledger", &[("ic", "xyz789")]),
            ("opend_assets", &[("ic", "qoctq")]),
        ]);

        let env = derive_environment(&local, &prod, &Network::new("ic"), &RecordingSink::new());
        assert_eq!(
            env.keys().collect::<Vec<_>>(),
            vec!["LEDGER_CANISTER_ID", "OPEND_ASSETS_CANISTER_ID"]
        );
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some("xyz789"));
    }

    #[test]
    fn test_custom_network_reads_production() {
        let prod = mapping(&[("ledger", &[("ic", "xyz789"), ("testnet", "t-1")])]);
        let env = derive_environment(
            &IdentifierMapping::new(),
            &prod,
            &Network::new("testnet"),
            &RecordingSink::new(),
        );
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some("t-1"));
    }

    #[test]
    fn test_key_collision_keeps_last_name() {
        let local = mapping(&[
            ("LEDGER", &[("local", "upper")]),
            ("ledger", &[("local", "lower")]),
        ]);
        let sink = RecordingSink::new();

        let env = derive_environment(
            &local,
            &IdentifierMapping::new(),
            &Network::new("local"),
            &sink,
        );
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("LEDGER_CANISTER_ID"), Some("lower"));
        assert_eq!(
            sink.diagnostics(),
            vec![Diagnostic::KeyCollision {
                key: "LEDGER_CANISTER_ID".into(),
                kept: "ledger".into(),
                dropped: "LEDGER".into(),
            }]
        );
    }

    #[test]
    fn test_options_from_config() {
        let sources = SourcesConfig::default();
        let environment = EnvironmentConfig::default();

        let options = ResolveOptions::from_config(&sources, &environment, |name| match name {
            "NODE_ENV" => Some("production".into()),
            _ => None,
        });
        assert_eq!(options.mode, BuildMode::Production);
        assert_eq!(options.network_override, None);
        assert_eq!(options.network().as_str(), "ic");

        let options = ResolveOptions::from_config(&sources, &environment, |name| match name {
            "NODE_ENV" => Some("production".into()),
            "DFX_NETWORK" => Some("local".into()),
            _ => None,
        });
        assert!(options.network().is_local());
    }
}
