//! Memoized domain sizes.
//!
//! Entries are keyed by entrant identity plus that entrant's current home
//! and away counts. Every apply or undo drops the entries of the two
//! entrants involved, plus those of any entrant for which one of the two
//! gained or lost candidate status. Every other entry is still exact.

use std::collections::HashMap;

use crate::constraint::DomainSize;
use crate::models::EntrantId;

/// Cache of [`DomainSize`] values per `(entrant, home_count, away_count)`.
#[derive(Debug, Clone, Default)]
pub struct DomainCache {
    entries: HashMap<EntrantId, HashMap<(usize, usize), DomainSize>>,
    hits: u64,
    misses: u64,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached size for `entrant` at the given counts.
    pub fn get(&mut self, entrant: EntrantId, home: usize, away: usize) -> Option<DomainSize> {
        let found = self
            .entries
            .get(&entrant)
            .and_then(|by_counts| by_counts.get(&(home, away)))
            .copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn insert(&mut self, entrant: EntrantId, home: usize, away: usize, size: DomainSize) {
        self.entries
            .entry(entrant)
            .or_default()
            .insert((home, away), size);
    }

    /// Drops every entry of `entrant`.
    pub fn invalidate(&mut self, entrant: EntrantId) {
        self.entries.remove(&entrant);
    }

    /// Entrants with at least one cached entry.
    pub fn entrants(&self) -> impl Iterator<Item = EntrantId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_insert() {
        let mut cache = DomainCache::new();
        assert!(cache.get(EntrantId(0), 0, 0).is_none());

        let size = DomainSize {
            home: 3,
            away: 2,
            reach: 5,
        };
        cache.insert(EntrantId(0), 0, 0, size);
        assert_eq!(cache.get(EntrantId(0), 0, 0), Some(size));
        assert!(cache.get(EntrantId(0), 1, 0).is_none());
        assert_eq!(cache.stats(), (1, 2));
    }

    #[test]
    fn test_invalidate_is_narrow() {
        let mut cache = DomainCache::new();
        let size = DomainSize {
            home: 1,
            away: 1,
            reach: 2,
        };
        cache.insert(EntrantId(0), 0, 0, size);
        cache.insert(EntrantId(0), 1, 0, size);
        cache.insert(EntrantId(1), 0, 0, size);
        cache.insert(EntrantId(2), 0, 1, size);
        assert_eq!(cache.len(), 4);

        cache.invalidate(EntrantId(0));
        assert_eq!(cache.len(), 2);
        let mut cached: Vec<_> = cache.entrants().collect();
        cached.sort();
        assert_eq!(cached, vec![EntrantId(1), EntrantId(2)]);
        assert!(cache.get(EntrantId(0), 0, 0).is_none());
        assert_eq!(cache.get(EntrantId(1), 0, 0), Some(size));
        assert_eq!(cache.get(EntrantId(2), 0, 1), Some(size));

        cache.invalidate(EntrantId(1));
        cache.invalidate(EntrantId(2));
        assert!(cache.is_empty());
    }
}
