//! Shared argument parsing and table output for the fnoscope CLI.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use fnoscope_lib::prelude::*;
use fnoscope_lib::market_offset;

use crate::ApiArgs;

/// Parse a `YYYY-MM-DD` date argument.
pub(crate) fn parse_date(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {what} date: {s}"))
}

/// Today's date in exchange time.
pub(crate) fn today() -> NaiveDate {
    Utc::now().with_timezone(&market_offset()).date_naive()
}

/// Parse a kind string into a ContractKind enum.
pub(crate) fn parse_kind(s: &str) -> Result<ContractKind> {
    match s.trim().to_lowercase().as_str() {
        "index" | "idx" => Ok(ContractKind::Index),
        "stock" | "stk" => Ok(ContractKind::Stock),
        _ => bail!("Unknown kind: {}. Valid options: index, stock", s),
    }
}

/// Resolve symbols against the registry, or take the whole registry when empty.
pub(crate) fn resolve_universe(symbols: &[String]) -> Result<Vec<Underlying>> {
    let registry = UnderlyingRegistry::global();
    if symbols.is_empty() {
        return Ok(registry.universe());
    }

    symbols
        .iter()
        .map(|symbol| {
            registry
                .get(symbol)
                .cloned()
                .ok_or_else(|| anyhow::Error::from(FnoError::UnknownUnderlying(symbol.clone())))
        })
        .collect()
}

/// Build the HTTP source from the global API flags.
pub(crate) fn build_source(api: &ApiArgs) -> Result<HttpSource> {
    let mut config = ClientConfig::default().with_timeout(Duration::from_secs(api.timeout_secs));
    if let Some(base_url) = &api.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(token) = &api.access_token {
        config = config.with_access_token(token.clone());
    }
    HttpSource::new(config).context("Failed to create HTTP client")
}

/// Print selected contracts as a table.
pub(crate) fn print_selection(selection: &Selection) {
    println!(
        "{:<28} {:<12} {:>10} {:<20} {}",
        "KEY", "UNDERLYING", "ID", "EXPIRY", "DESCRIPTION"
    );
    println!("{}", "-".repeat(90));

    for (key, contract) in selection.iter() {
        println!(
            "{:<28} {:<12} {:>10} {:<20} {}",
            key,
            contract.underlying,
            contract.instrument_id,
            contract.expiry.format("%Y-%m-%d %H:%M"),
            contract.description
        );
    }

    println!("\nTotal: {} contracts", selection.len());
}

/// Print bars as a table, timestamps in exchange time.
pub(crate) fn print_bars(bars: &[BarRecord]) {
    let offset = market_offset();
    println!(
        "{:<20} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12}",
        "TIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME", "OI"
    );
    println!("{}", "-".repeat(96));

    for bar in bars {
        let time = bar.datetime().map_or_else(
            || bar.timestamp.to_string(),
            |dt| dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        );
        println!(
            "{:<20} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12}",
            time, bar.open, bar.high, bar.low, bar.close, bar.volume, bar.open_interest
        );
    }
}
