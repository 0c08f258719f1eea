//! canister-env core library.
//!
//! Turns dfx `canister_ids.json` files into `<NAME>_CANISTER_ID` environment
//! variables for a frontend build: loading the local and production id files,
//! choosing the network, deriving the variables, merging them with build
//! defaults, and rendering the result.

pub mod build_env;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod mapping;
pub mod network;
pub mod output;
pub mod resolver;

// Re-exports for convenience.
pub use build_env::BuildEnvironment;
pub use config::AppConfig;
pub use diagnostics::{DiagnosticSink, RecordingSink, TracingSink};
pub use network::{BuildMode, Network};
pub use resolver::{resolve, ResolveOptions, ResolvedEnvironment};
