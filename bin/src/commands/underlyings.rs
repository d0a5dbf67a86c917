//! Underlyings command implementation.
//!
//! This module handles listing the default universe with optional filtering.

use crate::display::parse_kind;
use anyhow::Result;
use fnoscope_lib::prelude::*;

/// List underlyings with optional kind filter or search pattern.
pub(crate) fn list_underlyings(kind: Option<&str>, search: Option<&str>) -> Result<()> {
    let registry = UnderlyingRegistry::global();

    let mut underlyings: Vec<_> = match (kind, search) {
        (Some(kind), _) => {
            let kind = parse_kind(kind)?;
            registry.by_kind(kind).collect()
        }
        (_, Some(pattern)) => registry.search(pattern),
        (None, None) => registry.all().collect(),
    };

    if underlyings.is_empty() {
        println!("No underlyings found.");
        return Ok(());
    }
    underlyings.sort_by(|a, b| a.symbol().cmp(b.symbol()));

    println!("{:<14} {:<8} {:<10} {}", "SYMBOL", "KIND", "SERIES", "ALIASES");
    println!("{}", "-".repeat(60));

    for underlying in &underlyings {
        println!(
            "{:<14} {:<8} {:<10} {}",
            underlying.symbol(),
            underlying.kind().as_str(),
            underlying.kind().allowed_series().join(","),
            underlying.aliases().join(", ")
        );
    }

    println!("\nTotal: {} underlyings", underlyings.len());
    Ok(())
}
