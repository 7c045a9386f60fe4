//! Entrant registry.
//!
//! The registry is the single owner of all entrants in a draw. Search
//! mutates it only through [`EntrantRegistry::apply`] and
//! [`EntrantRegistry::undo`], an explicit reversible pair: `undo(p)` after
//! `apply(p)` restores the exact prior lists, provided undos mirror applies
//! in LIFO order.

use serde::{Deserialize, Serialize};

use super::{Entrant, EntrantId, EntrantSeed};

/// One home/away match between two entrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    /// Hosting entrant.
    pub home: EntrantId,
    /// Visiting entrant.
    pub away: EntrantId,
}

impl Pairing {
    pub fn new(home: EntrantId, away: EntrantId) -> Self {
        Self { home, away }
    }

    /// Builds the pairing `entrant` takes part in, given its role.
    pub fn for_role(entrant: EntrantId, opponent: EntrantId, as_home: bool) -> Self {
        if as_home {
            Self::new(entrant, opponent)
        } else {
            Self::new(opponent, entrant)
        }
    }
}

/// Indexed collection of entrants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrantRegistry {
    entrants: Vec<Entrant>,
}

impl EntrantRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates entrants with empty opponent lists, in seed order.
    pub fn from_seeds(seeds: &[EntrantSeed]) -> Self {
        let entrants = seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| Entrant::from_seed(EntrantId(i), seed))
            .collect();
        Self { entrants }
    }

    /// Appends an entrant and returns its id.
    pub fn push(&mut self, seed: &EntrantSeed) -> EntrantId {
        let id = EntrantId(self.entrants.len());
        self.entrants.push(Entrant::from_seed(id, seed));
        id
    }

    /// Number of entrants.
    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    /// Entrant by id.
    ///
    /// # Panics
    /// If `id` does not belong to this registry.
    #[inline]
    pub fn get(&self, id: EntrantId) -> &Entrant {
        &self.entrants[id.index()]
    }

    /// Mutable entrant access that bypasses pairing symmetry.
    ///
    /// Meant for building corrupted results in diagnostics and tests; the
    /// solver never uses it.
    pub fn entrant_mut(&mut self, id: EntrantId) -> &mut Entrant {
        &mut self.entrants[id.index()]
    }

    /// All entrants in input order.
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// All ids in input order.
    pub fn ids(&self) -> impl Iterator<Item = EntrantId> + '_ {
        self.entrants.iter().map(|e| e.id)
    }

    /// Finds an entrant by name.
    pub fn find(&self, name: &str) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.name == name)
    }

    /// Number of `id`'s current opponents from `affiliation`.
    pub fn affiliation_count(&self, id: EntrantId, affiliation: &str) -> usize {
        self.get(id)
            .opponents()
            .filter(|&o| self.get(o).affiliation == affiliation)
            .count()
    }

    /// Number of `id`'s current opponents from `pot`.
    pub fn pot_count(&self, id: EntrantId, pot: u32) -> usize {
        self.get(id)
            .opponents()
            .filter(|&o| self.get(o).pot == pot)
            .count()
    }

    /// Records a match: `away` joins `home`'s home list and `home` joins
    /// `away`'s away list.
    pub fn apply(&mut self, pairing: Pairing) {
        self.entrants[pairing.home.index()]
            .home_opponents
            .push(pairing.away);
        self.entrants[pairing.away.index()]
            .away_opponents
            .push(pairing.home);
    }

    /// Reverts the most recent [`apply`](Self::apply) of `pairing`.
    pub fn undo(&mut self, pairing: Pairing) {
        let home = &mut self.entrants[pairing.home.index()].home_opponents;
        debug_assert_eq!(home.last(), Some(&pairing.away), "undo out of order");
        home.pop();

        let away = &mut self.entrants[pairing.away.index()].away_opponents;
        debug_assert_eq!(away.last(), Some(&pairing.home), "undo out of order");
        away.pop();
    }

    /// Clears every entrant's opponent lists.
    pub fn reset(&mut self) {
        for entrant in &mut self.entrants {
            entrant.clear();
        }
    }

    /// Total opponent entries across all lists (twice the match count).
    pub fn assigned_slots(&self) -> usize {
        self.entrants
            .iter()
            .map(|e| e.home_count() + e.away_count())
            .sum()
    }
}
