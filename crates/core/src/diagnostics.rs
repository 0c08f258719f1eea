//! Diagnostic events emitted while resolving canister IDs.
//!
//! The resolver never logs directly. It reports structured [`Diagnostic`]
//! events to an injected [`DiagnosticSink`]; [`TracingSink`] forwards them to
//! `tracing`, and [`RecordingSink`] keeps them for inspection.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{error, info, warn};

use crate::mapping::Source;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A single event observed during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// About to read a mapping file.
    CheckingSource { source: Source, path: PathBuf },

    /// A mapping file was read and parsed.
    SourceLoaded {
        source: Source,
        path: PathBuf,
        entries: usize,
    },

    /// A mapping file was missing or malformed and is treated as empty.
    SourceUnavailable {
        source: Source,
        path: PathBuf,
        reason: String,
    },

    /// The network that selects identifiers.
    NetworkSelected { network: String },

    /// The selected mapping has no entries; nothing will be exported.
    EmptyConfig { network: String },

    /// A canister has no identifier for the selected network.
    MissingIdentifier { name: String, network: String },

    /// Two canister names map to the same variable name.
    KeyCollision {
        key: String,
        kept: String,
        dropped: String,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::CheckingSource { .. }
            | Diagnostic::SourceLoaded { .. }
            | Diagnostic::NetworkSelected { .. } => Level::Info,
            Diagnostic::SourceUnavailable { .. }
            | Diagnostic::MissingIdentifier { .. }
            | Diagnostic::KeyCollision { .. } => Level::Warn,
            Diagnostic::EmptyConfig { .. } => Level::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CheckingSource { source, path } => {
                write!(f, "checking for {} canister ids at {}", source, path.display())
            }
            Diagnostic::SourceLoaded {
                source,
                path,
                entries,
            } => write!(
                f,
                "loaded {} {} canister(s) from {}",
                entries,
                source,
                path.display()
            ),
            Diagnostic::SourceUnavailable {
                source,
                path,
                reason,
            } => write!(
                f,
                "no {} canister ids available at {} ({})",
                source,
                path.display(),
                reason
            ),
            Diagnostic::NetworkSelected { network } => write!(f, "using network '{}'", network),
            Diagnostic::EmptyConfig { network } => write!(
                f,
                "canister config for network '{}' is empty or undefined",
                network
            ),
            Diagnostic::MissingIdentifier { name, network } => write!(
                f,
                "canister id for '{}' is missing in the '{}' environment",
                name, network
            ),
            Diagnostic::KeyCollision { key, kept, dropped } => write!(
                f,
                "canisters '{}' and '{}' both map to {}; keeping '{}'",
                dropped, kept, key, kept
            ),
        }
    }
}

/// Receiver of resolution diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Forwards diagnostics to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::CheckingSource { source, path } => {
                info!(%source, path = %path.display(), "checking for canister_ids.json");
            }
            Diagnostic::SourceLoaded {
                source,
                path,
                entries,
            } => {
                info!(%source, path = %path.display(), entries, "loaded canister ids");
            }
            Diagnostic::SourceUnavailable {
                source,
                path,
                reason,
            } => {
                warn!(%source, path = %path.display(), reason = %reason, "no canister_ids.json found");
            }
            Diagnostic::NetworkSelected { network } => {
                info!(network = %network, "using network");
            }
            Diagnostic::EmptyConfig { network } => {
                error!(network = %network, "canister config is empty or undefined");
            }
            Diagnostic::MissingIdentifier { name, network } => {
                warn!(canister = %name, network = %network, "canister id missing for network");
            }
            Diagnostic::KeyCollision { key, kept, dropped } => {
                warn!(key = %key, kept = %kept, dropped = %dropped, "canister names collide");
            }
        }
    }
}

/// Keeps every diagnostic in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all diagnostics recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of recorded diagnostics at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.diagnostics()
            .iter()
            .filter(|d| d.level() == level)
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let d = Diagnostic::NetworkSelected {
            network: "ic".into(),
        };
        assert_eq!(d.level(), Level::Info);

        let d = Diagnostic::MissingIdentifier {
            name: "ledger".into(),
            network: "local".into(),
        };
        assert_eq!(d.level(), Level::Warn);

        let d = Diagnostic::EmptyConfig {
            network: "local".into(),
        };
        assert_eq!(d.level(), Level::Error);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.emit(Diagnostic::NetworkSelected {
            network: "local".into(),
        });
        sink.emit(Diagnostic::EmptyConfig {
            network: "local".into(),
        });

        let events = sink.diagnostics();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Diagnostic::NetworkSelected { .. }));
        assert_eq!(sink.count(Level::Error), 1);
        assert_eq!(sink.count(Level::Warn), 0);
    }

    #[test]
    fn test_display_names_canister_and_network() {
        let d = Diagnostic::MissingIdentifier {
            name: "ledger".into(),
            network: "ic".into(),
        };
        assert_eq!(
            d.to_string(),
            "canister id for 'ledger' is missing in the 'ic' environment"
        );
    }

    #[test]
    fn test_sink_by_reference() {
        fn emit_owned<S: DiagnosticSink>(sink: S) {
            sink.emit(Diagnostic::NetworkSelected {
                network: "ic".into(),
            });
        }

        let sink = RecordingSink::new();
        emit_owned(&sink);
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
