//! Reader for dfx `canister_ids.json` files.
//!
//! The file format:
//!
//! ```json
//! {
//!   "ledger": { "local": "rrkah-fqaaa-aaaaa-aaaaq-cai", "ic": "ryjl3-tyaaa-aaaaa-aaaba-cai" },
//!   "opend_assets": { "ic": "qoctq-giaaa-aaaaa-aaaea-cai" }
//! }
//! ```
//!
//! Only string identifiers are kept. A network value of any other JSON type
//! (`null`, a number, an object) is dropped, so that canister resolves as
//! missing for that network while the rest of the file still applies.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::MappingError;

/// Network name -> canister identifier.
pub type NetworkEntry = BTreeMap<String, String>;

/// Canister name -> per-network identifiers.
pub type IdentifierMapping = BTreeMap<String, NetworkEntry>;

/// Which of the two mapping files a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// `.dfx/local/canister_ids.json`, written by a local replica deploy.
    Local,
    /// `canister_ids.json` at the project root, written by mainnet deploys.
    Production,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local => f.write_str("local"),
            Source::Production => f.write_str("production"),
        }
    }
}

/// Utilities for loading canister id files.
pub struct MappingFile;

impl MappingFile {
    /// Load and parse a mapping file, reporting exactly what went wrong.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<IdentifierMapping, MappingError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MappingError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
        let raw: BTreeMap<String, Value> =
            serde_json::from_str(contents).map_err(|e| MappingError::Parse {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;
        let mapping: IdentifierMapping = raw
            .into_iter()
            .map(|(name, details)| {
                let entry = network_entry(&name, details);
                (name, entry)
            })
            .collect();

        debug!(path = %path.display(), count = mapping.len(), "parsed canister id file");
        Ok(mapping)
    }

    /// Load a mapping file, treating any failure as an empty mapping.
    ///
    /// Missing and malformed files are indistinguishable to the caller; both
    /// produce a [`Diagnostic::SourceUnavailable`] warning.
    pub fn load_or_empty<P: AsRef<Path>>(
        source: Source,
        path: P,
        sink: &dyn DiagnosticSink,
    ) -> IdentifierMapping {
        let path = path.as_ref();
        sink.emit(Diagnostic::CheckingSource {
            source,
            path: path.to_path_buf(),
        });

        match Self::load(path) {
            Ok(mapping) => {
                sink.emit(Diagnostic::SourceLoaded {
                    source,
                    path: path.to_path_buf(),
                    entries: mapping.len(),
                });
                mapping
            }
            Err(e) => {
                sink.emit(Diagnostic::SourceUnavailable {
                    source,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                IdentifierMapping::new()
            }
        }
    }
}

/// Keep the string-valued networks of one canister's details.
fn network_entry(name: &str, details: Value) -> NetworkEntry {
    match details {
        Value::Object(networks) => networks
            .into_iter()
            .filter_map(|(network, id)| match id {
                Value::String(id) => Some((network, id)),
                other => {
                    debug!(canister = name, network = %network, value = %other, "ignoring non-string canister id");
                    None
                }
            })
            .collect(),
        other => {
            debug!(canister = name, value = %other, "canister details are not an object");
            NetworkEntry::new()
        }
    }
}
