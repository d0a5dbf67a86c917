//! Underlying registry and near-month contract selection for fnoscope.
//!
//! This crate turns the broker's bulk instrument master into one tradable
//! futures contract per underlying:
//!
//! - [`UnderlyingRegistry`] - Default universe with display aliases
//! - [`MasterRow`] - Positional split of one master row
//! - [`select_contracts`] - Nearest non-expired future per underlying
//! - [`SelectionCache`] - Optional caller-owned memoization
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fnoscope_instruments::{UnderlyingRegistry, select_contracts};
//!
//! let registry = UnderlyingRegistry::global();
//! let universe = registry.universe();
//!
//! let master = "X|9001|1|NIFTY|Nifty 50 Fut|FUTIDX||||||||||Nifty 50|2026-02-24T14:30:00";
//! let as_of = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
//!
//! for (key, contract) in select_contracts(master, &universe, as_of).iter() {
//!     println!("{key}: {}", contract.instrument_id);
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use fnoscope_types::{ContractKind, Underlying};

mod cache;
mod row;
mod selector;

pub use cache::SelectionCache;
pub use row::{MIN_FIELDS, MasterRow, RowError, parse_expiry};
pub use selector::{Selection, SelectionStats, select_contracts, select_contracts_with_stats};

/// The default universe embedded at compile time.
const UNDERLYINGS_JSON: &str = include_str!("../data/underlyings.json");

/// Global registry instance.
static REGISTRY: OnceLock<UnderlyingRegistry> = OnceLock::new();

/// Registry of the underlyings whose near-month futures are tracked by default.
#[derive(Debug)]
pub struct UnderlyingRegistry {
    underlyings: HashMap<String, Underlying>,
}

impl UnderlyingRegistry {
    /// Returns the global underlying registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads underlyings from the embedded JSON data.
    fn load() -> Self {
        let list: Vec<Underlying> =
            serde_json::from_str(UNDERLYINGS_JSON).expect("Invalid underlyings.json");
        Self::from_underlyings(list)
    }

    /// Builds a registry from an explicit list.
    #[must_use]
    pub fn from_underlyings(list: impl IntoIterator<Item = Underlying>) -> Self {
        let underlyings = list
            .into_iter()
            .map(|u| (u.symbol().to_lowercase(), u))
            .collect();
        Self { underlyings }
    }

    /// Looks up an underlying by symbol or alias (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Underlying> {
        self.underlyings
            .get(&name.trim().to_lowercase())
            .or_else(|| self.underlyings.values().find(|u| u.is_named(name)))
    }

    /// Returns all underlyings as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &Underlying> {
        self.underlyings.values()
    }

    /// Returns the total number of underlyings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.underlyings.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.underlyings.is_empty()
    }

    /// Returns all index underlyings.
    pub fn indices(&self) -> impl Iterator<Item = &Underlying> {
        self.by_kind(ContractKind::Index)
    }

    /// Returns all stock underlyings.
    pub fn stocks(&self) -> impl Iterator<Item = &Underlying> {
        self.by_kind(ContractKind::Stock)
    }

    /// Returns underlyings of the given kind.
    pub fn by_kind(&self, kind: ContractKind) -> impl Iterator<Item = &Underlying> {
        self.underlyings.values().filter(move |u| u.kind() == kind)
    }

    /// Searches underlyings by symbol or alias pattern (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Underlying> {
        let pattern = pattern.to_lowercase();
        self.underlyings
            .values()
            .filter(|u| {
                u.symbol().to_lowercase().contains(&pattern)
                    || u.aliases()
                        .iter()
                        .any(|a| a.to_lowercase().contains(&pattern))
            })
            .collect()
    }

    /// Returns a cloned universe sorted by symbol, ready for selection.
    #[must_use]
    pub fn universe(&self) -> Vec<Underlying> {
        let mut universe: Vec<Underlying> = self.underlyings.values().cloned().collect();
        universe.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        universe
    }

    /// Returns all symbols sorted alphabetically.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.underlyings.values().map(Underlying::symbol).collect();
        symbols.sort_unstable();
        symbols
    }
}
