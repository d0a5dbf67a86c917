//! Near-month futures selection over the instrument master.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fnoscope_types::{InstrumentRecord, SelectedContract, Underlying};
use serde::Serialize;
use tracing::{debug, trace};

use crate::row::MasterRow;

/// Near-month contracts chosen for a universe, keyed by
/// `"{underlying}-FUT-{YYYY-MM-DD}"`.
///
/// Underlyings without an active contract are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    contracts: BTreeMap<String, SelectedContract>,
}

impl Selection {
    /// Returns the number of selected contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true if nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Looks up a contract by its composite key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SelectedContract> {
        self.contracts.get(key)
    }

    /// Looks up the contract chosen for an underlying symbol (case-insensitive).
    #[must_use]
    pub fn for_underlying(&self, symbol: &str) -> Option<&SelectedContract> {
        self.contracts
            .values()
            .find(|c| c.underlying.eq_ignore_ascii_case(symbol.trim()))
    }

    /// Iterates `(key, contract)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectedContract)> {
        self.contracts.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Iterates the selected contracts in key order.
    pub fn contracts(&self) -> impl Iterator<Item = &SelectedContract> {
        self.contracts.values()
    }

    /// Returns the composite key to instrument id mapping.
    #[must_use]
    pub fn instrument_ids(&self) -> BTreeMap<String, u64> {
        self.contracts
            .iter()
            .map(|(k, c)| (k.clone(), c.instrument_id))
            .collect()
    }

    /// Consumes the selection, returning the contracts in key order.
    #[must_use]
    pub fn into_contracts(self) -> Vec<SelectedContract> {
        self.contracts.into_values().collect()
    }
}

impl FromIterator<SelectedContract> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectedContract>>(iter: I) -> Self {
        Self {
            contracts: iter.into_iter().map(|c| (c.key(), c)).collect(),
        }
    }
}

/// Counters describing one pass over the instrument master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    /// Non-blank rows seen.
    pub rows: usize,
    /// Rows dropped for having too few fields.
    pub short_rows: usize,
    /// Rows that matched a target underlying.
    pub matched: usize,
    /// Matching rows dropped for a bad id or expiry.
    pub malformed: usize,
    /// Matching rows dropped because the contract had already expired.
    pub expired: usize,
    /// Contracts selected.
    pub selected: usize,
}

/// Selects the near-month future for each underlying in `universe`.
///
/// A row qualifies for an underlying when it is a regular future of the
/// right series whose trading symbol or matching key names the underlying,
/// and whose expiry date is on or after `as_of`. Among qualifying rows the
/// earliest expiry wins; on an exact tie the row seen first is kept.
///
/// Malformed rows are skipped. An empty master yields an empty selection.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use fnoscope_instruments::select_contracts;
/// use fnoscope_types::Underlying;
///
/// let master = "X|9001|1|NIFTY|Nifty 50 Fut|FUTIDX||||||||||Nifty 50|2026-02-24T14:30:00";
/// let universe = [Underlying::index("NIFTY").with_alias("Nifty 50")];
/// let as_of = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
///
/// let selection = select_contracts(master, &universe, as_of);
/// assert_eq!(selection.get("NIFTY-FUT-2026-02-24").unwrap().instrument_id, 9001);
/// ```
#[must_use]
pub fn select_contracts(master: &str, universe: &[Underlying], as_of: NaiveDate) -> Selection {
    select_contracts_with_stats(master, universe, as_of).0
}

/// Like [`select_contracts`], also returning scan counters.
#[must_use]
pub fn select_contracts_with_stats(
    master: &str,
    universe: &[Underlying],
    as_of: NaiveDate,
) -> (Selection, SelectionStats) {
    let mut stats = SelectionStats::default();
    let mut nearest: Vec<Option<InstrumentRecord>> = vec![None; universe.len()];

    for line in master.lines() {
        if line.trim().is_empty() {
            continue;
        }
        stats.rows += 1;

        let row = match MasterRow::split(line) {
            Ok(row) => row,
            Err(e) => {
                stats.short_rows += 1;
                trace!("Skipping master row {}: {}", stats.rows, e);
                continue;
            }
        };

        let key = row.matching_key();
        let targets: Vec<usize> = universe
            .iter()
            .enumerate()
            .filter(|(_, u)| {
                u.matches_fields(row.type_code, row.series, row.trading_symbol, key)
            })
            .map(|(i, _)| i)
            .collect();
        if targets.is_empty() {
            continue;
        }
        stats.matched += 1;

        let record = match row.to_record() {
            Ok(record) => record,
            Err(e) => {
                stats.malformed += 1;
                debug!("Skipping {} row {}: {}", row.trading_symbol, stats.rows, e);
                continue;
            }
        };

        if !record.is_active_on(as_of) {
            stats.expired += 1;
            continue;
        }

        for target in targets {
            let slot = &mut nearest[target];
            let replace = slot
                .as_ref()
                .is_none_or(|current| record.expiry < current.expiry);
            if replace {
                *slot = Some(record.clone());
            }
        }
    }

    let selection: Selection = universe
        .iter()
        .zip(nearest)
        .filter_map(|(underlying, record)| {
            record.map(|r| SelectedContract::from_record(underlying.symbol(), &r))
        })
        .collect();
    stats.selected = selection.len();

    debug!(
        "Scanned {} master rows: {} matched, {} malformed, {} expired, {} selected",
        stats.rows, stats.matched, stats.malformed, stats.expired, stats.selected
    );

    (selection, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        id: u64,
        type_code: &str,
        symbol: &str,
        series: &str,
        underlying: &str,
        expiry: &str,
    ) -> String {
        let id = id.to_string();
        let mut fields = vec![""; 17];
        fields[0] = "X";
        fields[1] = &id;
        fields[2] = type_code;
        fields[3] = symbol;
        fields[4] = "desc";
        fields[5] = series;
        fields[15] = underlying;
        fields[16] = expiry;
        fields.join("|")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nifty() -> Underlying {
        Underlying::index("NIFTY").with_alias("Nifty 50")
    }

    #[test]
    fn test_nifty_scenario() {
        let master = "X|9001|1|NIFTY|Nifty 50 Fut|FUTIDX||||||||||Nifty 50|2026-02-24T14:30:00";
        let selection = select_contracts(master, &[nifty()], date(2026, 2, 3));

        assert_eq!(selection.len(), 1);
        let contract = selection.get("NIFTY-FUT-2026-02-24").unwrap();
        assert_eq!(contract.instrument_id, 9001);
        assert_eq!(contract.expiry_date(), date(2026, 2, 24));
        assert_eq!(contract.description, "Nifty 50 Fut");
        assert_eq!(
            selection.instrument_ids().get("NIFTY-FUT-2026-02-24"),
            Some(&9001)
        );
    }

    #[test]
    fn test_picks_nearest_active_expiry() {
        let master = [
            row(3, "1", "NIFTY", "FUTIDX", "Nifty 50", "2026-04-28T14:30:00"),
            row(1, "1", "NIFTY", "FUTIDX", "Nifty 50", "2026-01-27T14:30:00"),
            row(2, "1", "NIFTY", "FUTIDX", "Nifty 50", "2026-02-24T14:30:00"),
            row(4, "1", "NIFTY", "FUTIDX", "Nifty 50", "2026-03-30T14:30:00"),
        ]
        .join("\n");

        let selection = select_contracts(&master, &[nifty()], date(2026, 2, 3));
        let contract = selection.for_underlying("nifty").unwrap();
        assert_eq!(contract.instrument_id, 2);
    }

    #[test]
    fn test_expired_only_row_is_never_selected() {
        let master = row(1, "1", "NIFTY", "FUTIDX", "", "2026-01-27T14:30:00");
        let (selection, stats) =
            select_contracts_with_stats(&master, &[nifty()], date(2026, 2, 3));

        assert!(selection.is_empty());
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn test_expiry_day_is_still_active() {
        let master = row(7, "1", "NIFTY", "FUTIDX", "", "2026-02-24T14:30:00");
        let selection = select_contracts(&master, &[nifty()], date(2026, 2, 24));
        assert_eq!(selection.for_underlying("NIFTY").unwrap().instrument_id, 7);
    }

    #[test]
    fn test_tie_keeps_first_row() {
        let master = [
            row(10, "1", "NIFTY", "FUTIDX", "", "2026-02-24T14:30:00"),
            row(11, "1", "NIFTY", "FUTIDX", "", "2026-02-24T14:30:00"),
        ]
        .join("\n");
        let selection = select_contracts(&master, &[nifty()], date(2026, 2, 3));
        assert_eq!(selection.for_underlying("NIFTY").unwrap().instrument_id, 10);
    }

    #[test]
    fn test_filters_type_code_and_series() {
        let master = [
            row(1, "3", "NIFTY", "FUTIDX", "", "2026-02-10T14:30:00"),
            row(2, "1", "NIFTY", "OPTIDX", "", "2026-02-11T14:30:00"),
            row(3, "1", "NIFTY", "FUTSTK", "", "2026-02-12T14:30:00"),
            row(4, "1", "NIFTY", "FUTIDX", "", "2026-02-24T14:30:00"),
        ]
        .join("\n");
        let selection = select_contracts(&master, &[nifty()], date(2026, 2, 3));
        assert_eq!(selection.for_underlying("NIFTY").unwrap().instrument_id, 4);
    }

    #[test]
    fn test_alias_and_symbol_fallback() {
        let master = [
            // Listed under a contract symbol, found through the alias.
            row(20, "1", "NIFTY26FEBFUT", "FUTIDX", "Nifty 50", "2026-02-24T14:30:00"),
            // Blank underlying column, found through the trading symbol.
            row(30, "1", "RELIANCE", "FUTSTK", "", "2026-02-24T14:30:00"),
        ]
        .join("\n");
        let universe = [nifty(), Underlying::stock("RELIANCE"), Underlying::stock("TCS")];
        let selection = select_contracts(&master, &universe, date(2026, 2, 3));

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.for_underlying("NIFTY").unwrap().instrument_id, 20);
        assert_eq!(
            selection.get("RELIANCE-FUT-2026-02-24").unwrap().instrument_id,
            30
        );
        assert!(selection.for_underlying("TCS").is_none());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let master = [
            "garbage".to_string(),
            "X|1|1|NIFTY".to_string(),
            row(40, "1", "NIFTY", "FUTIDX", "", "not-a-date"),
            row(41, "1", "NIFTY", "FUTIDX", "", ""),
            row(42, "1", "NIFTY", "FUTIDX", "", "2026-03-30T14:30:00"),
        ]
        .join("\r\n");
        let (selection, stats) =
            select_contracts_with_stats(&master, &[nifty()], date(2026, 2, 3));

        assert_eq!(selection.for_underlying("NIFTY").unwrap().instrument_id, 42);
        assert_eq!(stats.rows, 5);
        assert_eq!(stats.short_rows, 2);
        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.selected, 1);
    }

    #[test]
    fn test_empty_master() {
        assert!(select_contracts("", &[nifty()], date(2026, 2, 3)).is_empty());
        assert!(select_contracts(" \n\t\n", &[nifty()], date(2026, 2, 3)).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let master = [
            row(1, "1", "NIFTY", "FUTIDX", "", "2026-02-24T14:30:00"),
            row(2, "1", "RELIANCE", "FUTSTK", "", "2026-02-24T14:30:00"),
            row(3, "1", "RELIANCE", "FUTSTK", "", "2026-03-30T14:30:00"),
        ]
        .join("\n");
        let universe = [nifty(), Underlying::stock("RELIANCE")];
        let as_of = date(2026, 2, 3);

        assert_eq!(
            select_contracts(&master, &universe, as_of),
            select_contracts(&master, &universe, as_of)
        );
    }

    #[test]
    fn test_selected_expiry_is_minimal_among_qualifying_rows() {
        let expiries = [
            "2026-05-26",
            "2026-02-24",
            "2026-01-27",
            "2026-03-30",
            "2026-02-24",
            "2026-04-28",
        ];
        let master: Vec<String> = expiries
            .iter()
            .enumerate()
            .map(|(i, e)| row(i as u64 + 100, "1", "NIFTY", "FUTIDX", "", e))
            .collect();
        let as_of = date(2026, 2, 3);
        let selection = select_contracts(&master.join("\n"), &[nifty()], as_of);
        let chosen = selection.for_underlying("NIFTY").unwrap();

        for e in expiries {
            let e = NaiveDate::parse_from_str(e, "%Y-%m-%d").unwrap();
            if e >= as_of {
                assert!(chosen.expiry_date() <= e);
            }
        }
        assert_eq!(chosen.instrument_id, 101);
    }
}
