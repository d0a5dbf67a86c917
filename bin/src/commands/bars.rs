//! Bars command implementation.
//!
//! This module discovers the near-month contracts and downloads their bars one
//! contract at a time, skipping contracts whose fetch fails.

use crate::ApiArgs;
use crate::display::{build_source, parse_date, resolve_universe, today};
use anyhow::{Context, Result};
use fnoscope_lib::prelude::*;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::time::Duration;

/// Arguments of the bars command.
pub(crate) struct BarsOptions {
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
    pub(crate) interval: String,
    pub(crate) underlying: Vec<String>,
    pub(crate) segment: String,
    pub(crate) pause_ms: u64,
    pub(crate) deadline_secs: u64,
    pub(crate) concurrency: usize,
    pub(crate) json: bool,
    pub(crate) quiet: bool,
}

/// Download bars for the near-month contract of each requested underlying.
pub(crate) async fn bars(api: &ApiArgs, options: BarsOptions) -> Result<()> {
    let universe = resolve_universe(&options.underlying)?;

    // Parse start date (default to today in exchange time)
    let start = match options.start.as_deref() {
        Some(s) => parse_date(s, "start")?,
        None => today(),
    };

    // Parse end date (default to the start date)
    let end = match options.end.as_deref() {
        Some(s) => parse_date(s, "end")?,
        None => start,
    };

    let range = DateRange::new(start, end)?;
    let interval: Interval = options.interval.parse()?;
    let segment: Segment = options.segment.parse()?;

    let source = build_source(api)?;
    let deadline = Duration::from_secs(api.timeout_secs);
    let selection = discover_contracts(&source, &universe, start, deadline)
        .await
        .context("Contract discovery failed")?;

    if selection.is_empty() {
        println!("No active contracts as of {start}.");
        return Ok(());
    }

    let plan = FetchPlan::new(range, interval)
        .with_segment(segment)
        .with_pause(Duration::from_millis(options.pause_ms))
        .with_deadline(Duration::from_secs(options.deadline_secs))
        .with_concurrency(options.concurrency);

    // Setup progress bar
    let progress = if options.quiet || options.json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(selection.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} contracts {msg}")
                .expect("Invalid progress template")
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{interval} {start} -> {end}"));
        pb
    };

    let mut results: Vec<ContractBars> = Vec::with_capacity(selection.len());
    let mut stream = Box::pin(contract_bar_stream(
        &source,
        selection.into_contracts(),
        plan,
    ));

    while let Some(batch) = stream.next().await {
        progress.inc(1);
        results.push(batch);
    }

    let total_bars: usize = results.iter().map(|b| b.bars.len()).sum();
    let skipped = results.iter().filter(|b| b.had_error).count();
    let finish_msg = if skipped > 0 {
        format!("Downloaded {total_bars} bars ({skipped} contracts skipped due to errors)")
    } else {
        format!("Downloaded {total_bars} bars")
    };
    progress.finish_with_message(finish_msg);

    if options.json {
        let records: Vec<_> = results
            .iter()
            .map(|r| {
                json!({
                    "key": r.contract.key(),
                    "contract": r.contract,
                    "had_error": r.had_error,
                    "bars": r.bars,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{:<28} {:>10} {:>8} {:>8} {:<8}",
        "KEY", "ID", "BARS", "DROPPED", "STATUS"
    );
    println!("{}", "-".repeat(66));
    for result in &results {
        println!(
            "{:<28} {:>10} {:>8} {:>8} {:<8}",
            result.contract.key(),
            result.contract.instrument_id,
            result.bars.len(),
            result.dropped(),
            if result.had_error { "skipped" } else { "ok" }
        );
    }

    Ok(())
}
