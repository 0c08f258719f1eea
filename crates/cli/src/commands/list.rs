//! Tabular view of every canister id in both source files.

use std::collections::BTreeSet;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use canister_env_core::diagnostics::TracingSink;
use canister_env_core::mapping::{IdentifierMapping, MappingFile, Source};
use canister_env_core::resolver::env_key;

use super::{style, Session};

/// Print one row per canister per source file, one column per network.
pub fn run_list(session: &Session) -> Result<()> {
    let options = session.resolve_options();
    let network = options.network();

    let local = MappingFile::load_or_empty(Source::Local, &options.local_path, &TracingSink);
    let prod = MappingFile::load_or_empty(Source::Production, &options.prod_path, &TracingSink);

    if local.is_empty() && prod.is_empty() {
        println!("No canister ids found.");
        return Ok(());
    }

    let networks: BTreeSet<&str> = local
        .values()
        .chain(prod.values())
        .flat_map(|entry| entry.keys().map(String::as_str))
        .chain(std::iter::once(network.as_str()))
        .collect();

    println!();
    println!("{}", style::header("Canister IDs"));
    println!(
        "{}",
        style::dim(&format!(
            "selected network: {} (reads {} ids)",
            network,
            if network.is_local() { "local" } else { "production" }
        ))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Source"), Cell::new("Canister"), Cell::new("Variable")];
    header.extend(networks.iter().map(|n| {
        if *n == network.as_str() {
            Cell::new(format!("{} *", n)).fg(Color::Green)
        } else {
            Cell::new(n)
        }
    }));
    table.set_header(header);

    add_rows(&mut table, Source::Local, &local, &networks);
    add_rows(&mut table, Source::Production, &prod, &networks);

    println!("{}", table);
    println!();

    Ok(())
}

fn add_rows(table: &mut Table, source: Source, mapping: &IdentifierMapping, networks: &BTreeSet<&str>) {
    for (name, entry) in mapping {
        let mut row = vec![
            Cell::new(source),
            Cell::new(name),
            Cell::new(env_key(name)),
        ];
        row.extend(networks.iter().map(|n| match entry.get(*n) {
            Some(id) if !id.is_empty() => Cell::new(id),
            _ => Cell::new("—").fg(Color::DarkGrey),
        }));
        table.add_row(row);
    }
}
