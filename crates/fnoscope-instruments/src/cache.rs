//! Caller-owned cache of selection results.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use fnoscope_types::Underlying;
use tracing::trace;

use crate::{Selection, select_contracts};

/// Memoizes [`select_contracts`] for one universe.
///
/// Entries are keyed by a hash of the master blob and the as-of date, so a
/// new master or a new trading day always triggers a fresh scan. A scan for a
/// day evicts the entries of earlier days, so a long-running caller keeps at
/// most the current day's masters. The selector itself stays stateless; this
/// cache is owned and cleared by the caller.
#[derive(Debug)]
pub struct SelectionCache {
    universe: Vec<Underlying>,
    entries: HashMap<(u64, NaiveDate), Selection>,
    hits: u64,
    misses: u64,
}

impl SelectionCache {
    /// Creates an empty cache for the given universe.
    #[must_use]
    pub fn new(universe: Vec<Underlying>) -> Self {
        Self {
            universe,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the universe this cache selects for.
    #[must_use]
    pub fn universe(&self) -> &[Underlying] {
        &self.universe
    }

    /// Returns the selection for `master` as of `as_of`, computing it on a miss.
    pub fn select(&mut self, master: &str, as_of: NaiveDate) -> &Selection {
        let key = (blob_hash(master), as_of);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            trace!("Selection cache hit for {}", as_of);
        } else {
            self.misses += 1;
            self.entries.retain(|&(_, day), _| day >= as_of);
        }

        let universe = &self.universe;
        self.entries
            .entry(key)
            .or_insert_with(|| select_contracts(master, universe, as_of))
    }

    /// Returns the number of cached selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the number of lookups that required a scan.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops all cached selections.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn blob_hash(master: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    hasher.finish()
}
