//! Synthetic inputs for fnoscope benchmarks.

use chrono::{Duration, NaiveDate};
use fnoscope_lib::Underlying;

/// Reference date the generated master is selected against.
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 3).unwrap_or_default()
}

/// Builds an instrument master with `underlyings` futures chains of `expiries`
/// weekly contracts each, followed by the same number of equity rows.
///
/// Chains for symbols `SYM0`, `SYM1`, ... start one week before [`as_of`], so
/// each chain has one expired contract and a near-month one.
pub fn master_blob(underlyings: usize, expiries: usize) -> String {
    let first_expiry = as_of() - Duration::days(7);
    let mut out = String::new();
    let mut id = 1_u64;

    for u in 0..underlyings {
        for e in 0..expiries {
            let expiry = first_expiry + Duration::days(7 * e as i64);
            out.push_str(&format!(
                "NSE|{id}|1|SYM{u}|SYM{u} Fut|FUTSTK||||||||||SYM{u}|{}T15:30:00\n",
                expiry.format("%Y-%m-%d")
            ));
            id += 1;
        }
    }
    for u in 0..underlyings {
        out.push_str(&format!("NSE|{id}|0|SYM{u}|SYM{u} Ltd|EQ||||||||||||\n"));
        id += 1;
    }
    out
}

/// The universe matching [`master_blob`].
pub fn universe(underlyings: usize) -> Vec<Underlying> {
    (0..underlyings)
        .map(|u| Underlying::stock(format!("SYM{u}")))
        .collect()
}

/// Builds a bar-series response of `count` one-minute bars, with one
/// malformed segment every `bad_every` bars (0 for none).
pub fn bar_blob(count: usize, bad_every: usize) -> String {
    let start = 1_738_554_300_i64;
    let mut segments = Vec::with_capacity(count);

    for i in 0..count {
        if bad_every > 0 && i % bad_every == bad_every - 1 {
            segments.push("bad|entry".to_string());
            continue;
        }
        let cents = 2_295_000 + (i % 400) as i64;
        segments.push(format!(
            "{}|{}.{:02}|{}.{:02}|{}.{:02}|{}.{:02}|{}|{}|",
            start + 60 * i as i64,
            cents / 100,
            cents % 100,
            (cents + 25) / 100,
            (cents + 25) % 100,
            (cents - 25) / 100,
            (cents - 25) % 100,
            (cents + 5) / 100,
            (cents + 5) % 100,
            75 * (i % 50),
            12_000_000 + i
        ));
    }
    segments.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnoscope_lib::{decode_bars, select_contracts};

    #[test]
    fn test_master_blob_selects_every_chain() {
        let master = master_blob(5, 4);
        let selection = select_contracts(&master, &universe(5), as_of());
        assert_eq!(selection.len(), 5);
        assert!(
            selection
                .contracts()
                .all(|c| c.expiry_date() == as_of())
        );
    }

    #[test]
    fn test_bar_blob_drops_bad_segments() {
        let raw = bar_blob(100, 10);
        assert_eq!(decode_bars(&raw).len(), 90);
        assert_eq!(decode_bars(&bar_blob(10, 0)).len(), 10);
    }
}
