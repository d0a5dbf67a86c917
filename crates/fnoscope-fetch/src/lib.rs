//! Bar decoding, market-data collaborators and fetch orchestration for fnoscope.
//!
//! This crate moves raw text from the market-data API to typed records:
//!
//! - [`decode_bars`] - The one bar decoder shared by every call site
//! - [`MarketDataSource`] - Raw-text fetch collaborators
//! - [`HttpSource`] - `reqwest` implementation with optional retries
//! - [`url`] - Endpoint layout
//! - [`discover_contracts`] / [`contract_bar_stream`] - Discovery then bars per contract

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod parse;
mod source;
mod stream;
pub mod url;

pub use client::{ClientConfig, HttpSource};
pub use parse::{ParseError, bar_segment_count, decode_bar, decode_bars, encode_bars};
pub use source::{BarRequest, FetchError, MarketDataSource};
pub use stream::{
    ContractBars, FetchPlan, contract_bar_stream, discover_contracts, fetch_bars,
    fetch_equity_bars,
};
