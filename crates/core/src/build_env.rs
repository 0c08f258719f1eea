//! Merge resolved canister ids into the build's environment variables.
//!
//! Values set here are defaults in the sense of a bundler's environment
//! plugin: a variable that already exists in the process environment keeps
//! its process value.

use std::collections::BTreeMap;

use tracing::debug;

use crate::resolver::ResolvedEnvironment;

/// Where a build variable's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Configured default, e.g. `NODE_ENV=development`.
    Default,
    /// Derived from a `canister_ids.json` file.
    Resolved,
    /// Already present in the process environment.
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVar {
    pub value: String,
    pub origin: Origin,
}

/// The complete set of variables handed to the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, BuildVar>,
}

impl BuildEnvironment {
    pub fn new(defaults: &BTreeMap<String, String>) -> Self {
        let vars = defaults
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    BuildVar {
                        value: v.clone(),
                        origin: Origin::Default,
                    },
                )
            })
            .collect();
        Self { vars }
    }

    /// Layer resolved canister ids over the defaults.
    pub fn merge_resolved(mut self, resolved: &ResolvedEnvironment) -> Self {
        for (key, value) in resolved.iter() {
            self.vars.insert(
                key.to_string(),
                BuildVar {
                    value: value.to_string(),
                    origin: Origin::Resolved,
                },
            );
        }
        self
    }

    /// Replace every value `lookup` knows about (normally the process
    /// environment).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, var) in self.vars.iter_mut() {
            if let Some(value) = lookup(key) {
                debug!(key = %key, "build variable taken from process environment");
                var.value = value;
                var.origin = Origin::Override;
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&BuildVar> {
        self.vars.get(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BuildVar)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flat `key -> value` view.
    pub fn vars(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::mapping::IdentifierMapping;
    use crate::network::Network;
    use crate::resolver::derive_environment;

    fn resolved() -> ResolvedEnvironment {
        let local: IdentifierMapping = serde_json::from_str(
            r#"{ "ledger": { "local": "abc123" }, "token": { "local": "def456" } }"#,
        )
        .unwrap();
        derive_environment(
            &local,
            &IdentifierMapping::new(),
            &Network::new("local"),
            &RecordingSink::new(),
        )
    }

    fn defaults() -> BTreeMap<String, String> {
        BTreeMap::from([("NODE_ENV".to_string(), "development".to_string())])
    }

    #[test]
    fn test_merge_layers_resolved_over_defaults() {
        let env = BuildEnvironment::new(&defaults()).merge_resolved(&resolved());
        assert_eq!(env.len(), 3);
        assert_eq!(env.get("NODE_ENV").unwrap().origin, Origin::Default);
        assert_eq!(env.get("LEDGER_CANISTER_ID").unwrap().value, "abc123");
        assert_eq!(
            env.get("LEDGER_CANISTER_ID").unwrap().origin,
            Origin::Resolved
        );
    }

    #[test]
    fn test_resolved_beats_default_with_same_key() {
        let mut d = defaults();
        d.insert("LEDGER_CANISTER_ID".into(), "placeholder".into());
        let env = BuildEnvironment::new(&d).merge_resolved(&resolved());
        assert_eq!(env.get("LEDGER_CANISTER_ID").unwrap().value, "abc123");
    }

    #[test]
    fn test_process_environment_wins() {
        let env = BuildEnvironment::new(&defaults())
            .merge_resolved(&resolved())
            .apply_overrides(|key| match key {
                "NODE_ENV" => Some("production".into()),
                "TOKEN_CANISTER_ID" => Some("pinned".into()),
                _ => None,
            });

        let vars = env.vars();
        assert_eq!(vars["NODE_ENV"], "production");
        assert_eq!(vars["TOKEN_CANISTER_ID"], "pinned");
        assert_eq!(vars["LEDGER_CANISTER_ID"], "abc123");
        assert_eq!(env.get("NODE_ENV").unwrap().origin, Origin::Override);
    }

    #[test]
    fn test_overrides_do_not_add_variables() {
        let env = BuildEnvironment::new(&defaults()).apply_overrides(|_| Some("x".into()));
        assert_eq!(env.len(), 1);
    }
}
