//! Core types for fnoscope.
//!
//! This crate provides the value types shared across the workspace:
//!
//! - [`BarRecord`] - One decoded OHLC bar with volume and open interest
//! - [`InstrumentRecord`] - One retained row of the instrument master
//! - [`SelectedContract`] - The near-month contract chosen for an underlying
//! - [`Underlying`] - A target underlying with its matching rules
//! - [`Interval`] - Bar interval of a historical data request
//! - [`Segment`] - Exchange segment of a historical data request
//! - [`DateRange`] - Date range for data retrieval

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod contract;
mod date_range;
mod error;
mod interval;
mod segment;

pub use bar::BarRecord;
pub use contract::{ContractKind, InstrumentRecord, SelectedContract, Underlying};
pub use date_range::{DateRange, market_offset};
pub use error::{DateRangeError, FnoError, Result};
pub use interval::{Interval, IntervalParseError};
pub use segment::{Segment, SegmentParseError};
