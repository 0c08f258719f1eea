//! Generate a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};

pub const DEFAULT_CONFIG: &str = r#"# canister-env configuration
# Every setting is optional; the values below are the defaults.

[sources]
# Written by `dfx deploy` against a local replica.
local = ".dfx/local/canister_ids.json"
# Written by `dfx deploy --network ic`.
production = "canister_ids.json"

[environment]
# Selects the network; when unset, production builds use "ic", others "local".
network_var = "DFX_NETWORK"
# Build mode; only "production" counts as a production build.
mode_var = "NODE_ENV"

[build.defaults]
# Injected alongside the canister ids unless already set in the environment.
NODE_ENV = "development"

[output]
format = "dotenv"
# path = "dist/.env"

[logging]
level = "info"
"#;

/// Write [`DEFAULT_CONFIG`] to `output`, refusing to overwrite.
pub fn run_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Adjust the canister id paths if your dfx project lives elsewhere");
    println!(
        "  2. Validate with: canister-env --config {} validate",
        output.display()
    );
    println!(
        "  3. Build with: canister-env --config {} exec -- npm run build",
        output.display()
    );

    Ok(())
}
