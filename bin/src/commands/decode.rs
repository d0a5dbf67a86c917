//! Decode command implementation.
//!
//! This module decodes a saved bar-series response without touching the API.

use crate::display::print_bars;
use anyhow::{Context, Result};
use fnoscope_lib::{bar_segment_count, decode_bars};
use std::path::Path;

/// Decode a raw bar-series file and print the bars.
pub(crate) fn decode(file: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let bars = decode_bars(&raw);
    let dropped = bar_segment_count(&raw).saturating_sub(bars.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&bars)?);
    } else {
        print_bars(&bars);
        println!("\nTotal: {} bars", bars.len());
    }

    if dropped > 0 {
        tracing::warn!("{} malformed segments skipped", dropped);
    }
    Ok(())
}
