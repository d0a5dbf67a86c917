//! Discovery-to-decode orchestration.
//!
//! Discovery fetches the instrument master once and selects contracts; the
//! bar stream then fetches and decodes one series per selected contract.
//! A contract whose fetch fails or runs past its deadline is reported as an
//! empty, flagged batch and the stream moves on.

use std::time::Duration;

use chrono::NaiveDate;
use fnoscope_instruments::{Selection, select_contracts_with_stats};
use fnoscope_types::{
    BarRecord, DateRange, FnoError, Interval, Segment, SelectedContract, Underlying,
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{BarRequest, FetchError, MarketDataSource, bar_segment_count, decode_bars};

/// Settings for fetching bars across a set of contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Segment the contracts trade on.
    pub segment: Segment,
    /// Date range to request.
    pub range: DateRange,
    /// Bar interval to request.
    pub interval: Interval,
    /// Minimum spacing between the starts of consecutive requests.
    pub pause: Duration,
    /// Upper bound on a single fetch.
    pub deadline: Duration,
    /// Fetches in flight at once. Results keep contract order regardless.
    pub concurrency: usize,
}

impl FetchPlan {
    /// Creates a sequential derivative-segment plan with default pacing.
    #[must_use]
    pub const fn new(range: DateRange, interval: Interval) -> Self {
        Self {
            segment: Segment::NseFno,
            range,
            interval,
            pause: Duration::from_millis(500),
            deadline: Duration::from_secs(30),
            concurrency: 1,
        }
    }

    /// Sets the segment.
    #[must_use]
    pub const fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = segment;
        self
    }

    /// Sets the pause between requests.
    #[must_use]
    pub const fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Sets the per-fetch deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the number of fetches in flight.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Builds the request for one instrument.
    #[must_use]
    pub const fn request(&self, instrument_id: u64) -> BarRequest {
        BarRequest::new(instrument_id, self.segment, self.range, self.interval)
    }
}

/// The decoded bars of one contract.
#[derive(Debug, Clone)]
pub struct ContractBars {
    /// The contract the bars belong to.
    pub contract: SelectedContract,
    /// Decoded bars in response order.
    pub bars: Vec<BarRecord>,
    /// Non-empty segments in the raw response.
    pub segments: usize,
    /// Whether the fetch failed and was skipped.
    pub had_error: bool,
}

impl ContractBars {
    /// Creates a successful batch.
    #[must_use]
    pub const fn new(contract: SelectedContract, bars: Vec<BarRecord>, segments: usize) -> Self {
        Self {
            contract,
            bars,
            segments,
            had_error: false,
        }
    }

    /// Creates an empty batch standing in for a failed fetch.
    #[must_use]
    pub const fn skipped_error(contract: SelectedContract) -> Self {
        Self {
            contract,
            bars: Vec::new(),
            segments: 0,
            had_error: true,
        }
    }

    /// Returns the number of segments the decoder dropped.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.segments.saturating_sub(self.bars.len())
    }
}

/// Fetches the instrument master and selects one contract per underlying.
///
/// # Errors
///
/// Returns an error if the master cannot be fetched within `deadline` or
/// comes back empty. Malformed rows inside the master are skipped, never
/// reported.
pub async fn discover_contracts<S>(
    source: &S,
    universe: &[Underlying],
    as_of: NaiveDate,
    deadline: Duration,
) -> Result<Selection, FnoError>
where
    S: MarketDataSource + ?Sized,
{
    let master = with_deadline(deadline, source.fetch_instrument_master()).await?;
    if master.trim().is_empty() {
        return Err(FnoError::EmptyMaster);
    }

    let (selection, stats) = select_contracts_with_stats(&master, universe, as_of);
    info!(
        "Selected {} of {} underlyings as of {} ({} rows scanned)",
        stats.selected,
        universe.len(),
        as_of,
        stats.rows
    );
    Ok(selection)
}

/// Streams decoded bars for each contract, in input order.
///
/// Each fetch is bounded by `plan.deadline`. Request starts are spaced at
/// least `plan.pause` apart whatever the concurrency. Failures are logged and
/// yield [`ContractBars::skipped_error`]; they are not retried.
pub fn contract_bar_stream<'a, S>(
    source: &'a S,
    contracts: Vec<SelectedContract>,
    plan: FetchPlan,
) -> impl Stream<Item = ContractBars> + 'a
where
    S: MarketDataSource + ?Sized,
{
    stream::iter(contracts.into_iter().enumerate())
        .then(move |(index, contract)| async move {
            if index > 0 && !plan.pause.is_zero() {
                tokio::time::sleep(plan.pause).await;
            }
            contract
        })
        .map(move |contract| async move {
            let request = plan.request(contract.instrument_id);
            match with_deadline(plan.deadline, source.fetch_bars(&request)).await {
                Ok(raw) => {
                    let bars = decode_bars(&raw);
                    let segments = bar_segment_count(&raw);
                    debug!(
                        "{}: {} bars from {} segments",
                        contract.key(),
                        bars.len(),
                        segments
                    );
                    ContractBars::new(contract, bars, segments)
                }
                Err(e) => {
                    warn!("Skipping {}: {}", contract.key(), e);
                    ContractBars::skipped_error(contract)
                }
            }
        })
        .buffered(plan.concurrency.max(1))
}

/// Fetches and decodes one bar series.
///
/// # Errors
///
/// Returns an error if the fetch fails or runs past `deadline`.
pub async fn fetch_bars<S>(
    source: &S,
    request: &BarRequest,
    deadline: Duration,
) -> Result<Vec<BarRecord>, FnoError>
where
    S: MarketDataSource + ?Sized,
{
    let raw = with_deadline(deadline, source.fetch_bars(request)).await?;
    Ok(decode_bars(&raw))
}

/// Fetches and decodes the bars of a cash-equity instrument.
///
/// # Errors
///
/// Returns an error if the fetch fails or runs past `deadline`.
pub async fn fetch_equity_bars<S>(
    source: &S,
    instrument_id: u64,
    range: DateRange,
    interval: Interval,
    deadline: Duration,
) -> Result<Vec<BarRecord>, FnoError>
where
    S: MarketDataSource + ?Sized,
{
    let request = BarRequest::new(instrument_id, Segment::NseEquity, range, interval);
    fetch_bars(source, &request, deadline).await
}

async fn with_deadline<T, F>(deadline: Duration, fetch: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(deadline, fetch)
        .await
        .map_err(|_| FetchError::Timeout(deadline))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use tokio::time::Instant;

    const DEADLINE: Duration = Duration::from_secs(30);

    const MASTER: &str = "\
X|9001|1|NIFTY|Nifty 50 Fut|FUTIDX||||||||||Nifty 50|2026-02-24T14:30:00
X|9002|1|BANKNIFTY|Bank Fut|FUTIDX||||||||||Nifty Bank|2026-02-24T14:30:00
X|9003|1|RELIANCE|Reliance Fut|FUTSTK||||||||||RELIANCE|2026-02-24T14:30:00";

    #[derive(Default)]
    struct MemorySource {
        master: String,
        master_down: bool,
        master_hangs: bool,
        bars: HashMap<u64, String>,
        failing: HashSet<u64>,
        hanging: HashSet<u64>,
        requests: Mutex<Vec<BarRequest>>,
        started: Mutex<Vec<Instant>>,
    }

    #[async_trait]
    impl MarketDataSource for MemorySource {
        async fn fetch_instrument_master(&self) -> Result<String, FetchError> {
            if self.master_down {
                return Err(FetchError::Unavailable("master offline".to_string()));
            }
            if self.master_hangs {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(self.master.clone())
        }

        async fn fetch_bars(&self, request: &BarRequest) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(*request);
            self.started.lock().unwrap().push(Instant::now());
            let id = request.instrument_id;
            if self.hanging.contains(&id) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.failing.contains(&id) {
                return Err(FetchError::ServerError { status: 500 });
            }
            Ok(self.bars.get(&id).cloned().unwrap_or_default())
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
    }

    fn universe() -> Vec<Underlying> {
        vec![
            Underlying::index("NIFTY").with_alias("Nifty 50"),
            Underlying::index("BANKNIFTY").with_alias("Nifty Bank"),
            Underlying::stock("RELIANCE"),
        ]
    }

    fn plan() -> FetchPlan {
        FetchPlan::new(DateRange::single_day(as_of()), Interval::Minute1)
    }

    fn source() -> MemorySource {
        let mut source = MemorySource {
            master: MASTER.to_string(),
            ..MemorySource::default()
        };
        source.bars.insert(9001, "1|2|3|1|2|10|5|,2|2|3|1|2|11|6|".to_string());
        source.bars.insert(9002, "1|2|3|1|2|10|5|,bad|entry,".to_string());
        source.bars.insert(9003, "1|2|3|1|2|10|5|".to_string());
        source
    }

    async fn contracts(source: &MemorySource) -> Vec<SelectedContract> {
        discover_contracts(source, &universe(), as_of(), DEADLINE)
            .await
            .unwrap()
            .into_contracts()
    }

    #[tokio::test]
    async fn test_discover_contracts() {
        let selection = discover_contracts(&source(), &universe(), as_of(), DEADLINE)
            .await
            .unwrap();
        assert_eq!(selection.len(), 3);
        assert_eq!(
            selection.get("NIFTY-FUT-2026-02-24").map(|c| c.instrument_id),
            Some(9001)
        );
    }

    #[tokio::test]
    async fn test_discover_propagates_master_failure() {
        let mut source = source();
        source.master_down = true;
        let err = discover_contracts(&source, &universe(), as_of(), DEADLINE)
            .await
            .unwrap_err();
        assert!(matches!(err, FnoError::Http(_)));
    }

    #[tokio::test]
    async fn test_discover_rejects_empty_master() {
        let source = MemorySource::default();
        let err = discover_contracts(&source, &universe(), as_of(), DEADLINE)
            .await
            .unwrap_err();
        assert!(matches!(err, FnoError::EmptyMaster));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discover_times_out_on_hanging_master() {
        let mut source = source();
        source.master_hangs = true;
        let deadline = Duration::from_secs(5);

        let started = Instant::now();
        let err = discover_contracts(&source, &universe(), as_of(), deadline)
            .await
            .unwrap_err();
        assert!(matches!(err, FnoError::Timeout(d) if d == deadline));
        assert!(started.elapsed() < Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_bars_times_out() {
        let mut source = source();
        source.hanging.insert(9003);
        let range = DateRange::single_day(as_of());

        let err = fetch_equity_bars(&source, 9003, range, Interval::Day1, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FnoError::Timeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_keeps_order_and_decodes() {
        let source = source();
        let contracts = contracts(&source).await;
        let expected: Vec<u64> = contracts.iter().map(|c| c.instrument_id).collect();

        let batches: Vec<ContractBars> = contract_bar_stream(&source, contracts, plan())
            .collect()
            .await;

        let ids: Vec<u64> = batches.iter().map(|b| b.contract.instrument_id).collect();
        assert_eq!(ids, expected);
        assert!(batches.iter().all(|b| !b.had_error));

        let bank = batches
            .iter()
            .find(|b| b.contract.instrument_id == 9002)
            .unwrap();
        assert_eq!(bank.bars.len(), 1);
        assert_eq!(bank.segments, 2);
        assert_eq!(bank.dropped(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_and_timeout_are_skipped() {
        let mut source = source();
        source.failing.insert(9001);
        source.hanging.insert(9002);
        let contracts = contracts(&source).await;

        let plan = plan().with_deadline(Duration::from_secs(5));
        let batches: Vec<ContractBars> = contract_bar_stream(&source, contracts, plan)
            .collect()
            .await;

        assert_eq!(batches.len(), 3);
        for batch in &batches {
            match batch.contract.instrument_id {
                9001 | 9002 => assert!(batch.had_error && batch.bars.is_empty()),
                _ => assert_eq!(batch.bars.len(), 1),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_use_plan_segment_and_pause() {
        let source = source();
        let contracts = contracts(&source).await;
        let plan = plan().with_pause(Duration::from_secs(2));

        let started = Instant::now();
        let _: Vec<ContractBars> = contract_bar_stream(&source, contracts, plan)
            .collect()
            .await;

        assert!(started.elapsed() >= Duration::from_secs(4));
        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.segment == Segment::NseFno));
        assert!(requests.iter().all(|r| r.interval == Interval::Minute1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_plan_keeps_order() {
        let source = source();
        let contracts = contracts(&source).await;
        let expected: Vec<u64> = contracts.iter().map(|c| c.instrument_id).collect();

        let plan = plan().with_concurrency(3).with_pause(Duration::ZERO);
        let ids: Vec<u64> = contract_bar_stream(&source, contracts, plan)
            .map(|b| b.contract.instrument_id)
            .collect()
            .await;
        assert_eq!(ids, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_spaces_concurrent_requests() {
        let source = source();
        let contracts = contracts(&source).await;
        let pause = Duration::from_secs(2);

        let plan = plan().with_concurrency(3).with_pause(pause);
        let _: Vec<ContractBars> = contract_bar_stream(&source, contracts, plan)
            .collect()
            .await;

        let started = source.started.lock().unwrap();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= pause);
        }
    }

    #[tokio::test]
    async fn test_fetch_equity_bars_uses_equity_segment() {
        let source = source();
        let range = DateRange::single_day(as_of());
        let bars = fetch_equity_bars(&source, 9003, range, Interval::Day1, DEADLINE)
            .await
            .unwrap();
        assert_eq!(bars.len(), 1);

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests[0].segment, Segment::NseEquity);
        assert_eq!(requests[0].interval, Interval::Day1);
    }

    #[test]
    fn test_contract_bars_skipped_error() {
        let contract = SelectedContract {
            underlying: "NIFTY".to_string(),
            description: String::new(),
            instrument_id: 1,
            expiry: as_of().and_hms_opt(15, 30, 0).unwrap(),
        };
        let batch = ContractBars::skipped_error(contract);
        assert!(batch.bars.is_empty());
        assert!(batch.had_error);
        assert_eq!(batch.dropped(), 0);
    }
}
