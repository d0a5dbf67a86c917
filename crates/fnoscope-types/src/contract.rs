//! Derivative contract definitions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kind of futures contract an underlying trades as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// Futures on an index (series `FUTIDX`).
    #[serde(alias = "index_future")]
    Index,
    /// Futures on a single stock (series `FUTSTK`).
    #[serde(alias = "stock_future")]
    Stock,
}

impl ContractKind {
    /// Returns the series codes accepted for this kind.
    #[must_use]
    pub const fn allowed_series(&self) -> &'static [&'static str] {
        match self {
            Self::Index => &["FUTIDX"],
            Self::Stock => &["FUTSTK"],
        }
    }

    /// Returns true if the series code is accepted for this kind.
    #[must_use]
    pub fn allows_series(&self, series: &str) -> bool {
        let series = series.trim();
        self.allowed_series()
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(series))
    }

    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Stock => "stock",
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A target underlying together with the rules used to find its futures.
///
/// The exchange does not always list an index future under its trading
/// symbol; the underlying column may carry a descriptive name such as
/// `"Nifty 50"`. Those names are kept as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Underlying {
    /// Trading symbol (e.g., "NIFTY", "RELIANCE").
    symbol: String,
    /// Contract kind, which decides the accepted series codes.
    kind: ContractKind,
    /// Display names the master may use in its underlying column.
    #[serde(default)]
    aliases: Vec<String>,
}

impl Underlying {
    /// Creates a new underlying without aliases.
    #[must_use]
    pub fn new(symbol: impl Into<String>, kind: ContractKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            aliases: Vec::new(),
        }
    }

    /// Creates an index underlying.
    #[must_use]
    pub fn index(symbol: impl Into<String>) -> Self {
        Self::new(symbol, ContractKind::Index)
    }

    /// Creates a stock underlying.
    #[must_use]
    pub fn stock(symbol: impl Into<String>) -> Self {
        Self::new(symbol, ContractKind::Stock)
    }

    /// Adds a display alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Returns the trading symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the contract kind.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Returns the display aliases.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns true if `key` names this underlying, by symbol or alias.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case.
    #[must_use]
    pub fn is_named(&self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        self.symbol.eq_ignore_ascii_case(key)
            || self
                .aliases
                .iter()
                .any(|alias| alias.trim().eq_ignore_ascii_case(key))
    }

    /// Returns true if the raw master fields describe a regular future on this
    /// underlying.
    #[must_use]
    pub fn matches_fields(
        &self,
        type_code: &str,
        series: &str,
        trading_symbol: &str,
        matching_key: &str,
    ) -> bool {
        type_code.trim() == InstrumentRecord::REGULAR_FUTURE_CODE
            && self.kind.allows_series(series)
            && (self.symbol.eq_ignore_ascii_case(trading_symbol.trim())
                || self.is_named(matching_key))
    }
}

impl std::fmt::Display for Underlying {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.kind)
    }
}

/// One row of the instrument master, reduced to the fields selection needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Numeric instrument identifier used by the historical data API.
    pub instrument_id: u64,
    /// Instrument-type code (`"1"` for a regular future).
    pub type_code: String,
    /// Exchange trading symbol.
    pub trading_symbol: String,
    /// Human-readable description.
    pub description: String,
    /// Series code (e.g., "FUTIDX", "FUTSTK", "OPTSTK").
    pub series: String,
    /// Underlying name. Blank for spread-style rows.
    pub underlying: String,
    /// Contract expiry.
    pub expiry: NaiveDateTime,
}

impl InstrumentRecord {
    /// Instrument-type code of a regular (non-spread) future.
    pub const REGULAR_FUTURE_CODE: &'static str = "1";

    /// Returns the key used to match this row against an underlying.
    ///
    /// This is the underlying column, or the trading symbol when that column
    /// is blank.
    #[must_use]
    pub fn matching_key(&self) -> &str {
        let underlying = self.underlying.trim();
        if underlying.is_empty() {
            self.trading_symbol.trim()
        } else {
            underlying
        }
    }

    /// Returns the expiry date.
    #[must_use]
    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry.date()
    }

    /// Returns true if the contract has not expired as of `date`.
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.expiry_date() >= date
    }
}

/// The near-month futures contract chosen for one underlying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedContract {
    /// Trading symbol of the underlying.
    pub underlying: String,
    /// Human-readable description of the contract.
    pub description: String,
    /// Numeric instrument identifier.
    pub instrument_id: u64,
    /// Contract expiry.
    pub expiry: NaiveDateTime,
}

impl SelectedContract {
    /// Creates a selection for `underlying` from a master record.
    #[must_use]
    pub fn from_record(underlying: impl Into<String>, record: &InstrumentRecord) -> Self {
        Self {
            underlying: underlying.into(),
            description: record.description.trim().to_string(),
            instrument_id: record.instrument_id,
            expiry: record.expiry,
        }
    }

    /// Returns the expiry date.
    #[must_use]
    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry.date()
    }

    /// Returns the stable composite key `"{underlying}-FUT-{YYYY-MM-DD}"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}-FUT-{}",
            self.underlying,
            self.expiry_date().format("%Y-%m-%d")
        )
    }
}

impl std::fmt::Display for SelectedContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key(), self.instrument_id)
    }
}
