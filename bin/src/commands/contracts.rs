//! Contracts command implementation.
//!
//! This module runs near-month discovery against a local master file or the API.

use crate::ApiArgs;
use crate::display::{build_source, parse_date, print_selection, resolve_universe, today};
use anyhow::{Context, Result};
use fnoscope_lib::prelude::*;
use fnoscope_lib::select_contracts_with_stats;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Select and print the near-month contract for each requested underlying.
pub(crate) async fn contracts(
    api: &ApiArgs,
    master: Option<&Path>,
    as_of: Option<&str>,
    symbols: &[String],
    json: bool,
) -> Result<()> {
    let universe = resolve_universe(symbols)?;
    let as_of = match as_of {
        Some(s) => parse_date(s, "as-of")?,
        None => today(),
    };

    let selection = match master {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let (selection, stats) = select_contracts_with_stats(&text, &universe, as_of);
            info!(
                "{} rows, {} matched, {} malformed, {} expired",
                stats.rows, stats.matched, stats.malformed, stats.expired
            );
            selection
        }
        None => {
            let source = build_source(api)?;
            let deadline = Duration::from_secs(api.timeout_secs);
            discover_contracts(&source, &universe, as_of, deadline)
                .await
                .context("Contract discovery failed")?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    if selection.is_empty() {
        println!("No active contracts as of {as_of}.");
        return Ok(());
    }
    print_selection(&selection);
    Ok(())
}
