//! Contract discovery and bar decoding for brokerage market-data APIs.
//!
//! This is a facade crate that re-exports functionality from the fnoscope
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use fnoscope_lib::prelude::*;
//! use futures::StreamExt;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let universe = UnderlyingRegistry::global().universe();
//!     let source = HttpSource::new(ClientConfig::default().with_access_token("token"))?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let deadline = Duration::from_secs(30);
//!     let selection = discover_contracts(&source, &universe, today, deadline).await?;
//!
//!     let plan = FetchPlan::new(DateRange::single_day(today), Interval::Minute1);
//!     let mut stream = Box::pin(contract_bar_stream(&source, selection.into_contracts(), plan));
//!     while let Some(batch) = stream.next().await {
//!         println!("{}: {} bars", batch.contract, batch.bars.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use fnoscope_types::*;

// Re-export registry and selection
pub use fnoscope_instruments::{
    MasterRow, RowError, Selection, SelectionCache, SelectionStats, UnderlyingRegistry,
    select_contracts, select_contracts_with_stats,
};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use fnoscope_fetch::{
    BarRequest, ClientConfig, ContractBars, FetchError, FetchPlan, HttpSource, MarketDataSource,
    ParseError, bar_segment_count, contract_bar_stream, decode_bar, decode_bars,
    discover_contracts, encode_bars, fetch_bars, fetch_equity_bars, url,
};

/// Prelude module for convenient imports.
///
/// ```
/// use fnoscope_lib::prelude::*;
/// ```
pub mod prelude {
    pub use fnoscope_types::{
        BarRecord, ContractKind, DateRange, DateRangeError, FnoError, Interval, Result,
        Segment, SelectedContract, Underlying,
    };

    pub use fnoscope_instruments::{Selection, SelectionCache, UnderlyingRegistry, select_contracts};

    #[cfg(feature = "fetch")]
    pub use fnoscope_fetch::{
        ClientConfig, ContractBars, FetchPlan, HttpSource, MarketDataSource, contract_bar_stream,
        decode_bars, discover_contracts, fetch_equity_bars,
    };
}
