//! Recursive search state.

use rand::Rng;

use crate::constraint::{ConstraintEngine, DomainSize};
use crate::models::{EntrantId, EntrantRegistry, Pairing};

use super::{order_candidates, DomainCache, SearchOutcome, SearchReport, SolverConfig};

/// Mutable state of one search run.
pub(super) struct Search<'a, 'p, R: Rng + ?Sized> {
    engine: ConstraintEngine<'p>,
    config: &'a SolverConfig,
    registry: &'a mut EntrantRegistry,
    order: Vec<EntrantId>,
    rng: &'a mut R,
    cache: DomainCache,
    backtracks: u64,
    assignments: u64,
}

impl<'a, 'p, R: Rng + ?Sized> Search<'a, 'p, R> {
    pub(super) fn new(
        engine: ConstraintEngine<'p>,
        config: &'a SolverConfig,
        registry: &'a mut EntrantRegistry,
        order: Vec<EntrantId>,
        rng: &'a mut R,
    ) -> Self {
        Self {
            engine,
            config,
            registry,
            order,
            rng,
            cache: DomainCache::new(),
            backtracks: 0,
            assignments: 0,
        }
    }

    pub(super) fn run(&mut self) -> SearchOutcome {
        self.descend()
    }

    pub(super) fn report(&self, outcome: SearchOutcome) -> SearchReport {
        let (hits, misses) = self.cache.stats();
        log::trace!("Domain cache: {hits} hits, {misses} misses");
        SearchReport {
            outcome,
            backtracks: self.backtracks,
            assignments: self.assignments,
        }
    }

    fn descend(&mut self) -> SearchOutcome {
        if self.backtracks > self.config.max_backtracks {
            return SearchOutcome::Exhausted;
        }

        let profile = self.engine.profile();
        let incomplete: Vec<EntrantId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| !self.registry.get(id).is_complete(profile))
            .collect();
        if incomplete.is_empty() {
            return SearchOutcome::Solved;
        }

        // Forward check and MRV in one pass
        let mut chosen = incomplete[0];
        let mut best = usize::MAX;
        for &id in &incomplete {
            let size = self.domain(id);
            if self.engine.is_starved(&*self.registry, id, size) {
                return SearchOutcome::DeadEnd;
            }
            if size.total() < best {
                best = size.total();
                chosen = id;
            }
        }

        let entrant = self.registry.get(chosen);
        let mut roles = Vec::with_capacity(2);
        if entrant.needs_home(profile) > 0 {
            roles.push(true);
        }
        if entrant.needs_away(profile) > 0 {
            roles.push(false);
        }

        for as_home in roles {
            let candidates = self.candidates(chosen, &incomplete, as_home);
            for opponent in candidates {
                let pairing = Pairing::for_role(chosen, opponent, as_home);
                self.apply(pairing);
                match self.descend() {
                    SearchOutcome::Solved => return SearchOutcome::Solved,
                    outcome => {
                        self.undo(pairing);
                        if outcome == SearchOutcome::Exhausted {
                            return SearchOutcome::Exhausted;
                        }
                    }
                }
            }
        }

        SearchOutcome::DeadEnd
    }

    /// Valid opponents for `chosen`, most constrained first.
    fn candidates(&mut self, chosen: EntrantId, incomplete: &[EntrantId], as_home: bool) -> Vec<EntrantId> {
        let pool = incomplete.iter().copied().filter(|&id| id != chosen);
        let mut candidates = self
            .engine
            .valid_candidates(&*self.registry, chosen, pool, as_home);

        let mut totals = vec![0; self.registry.len()];
        for &c in &candidates {
            totals[c.index()] = self.domain(c).total();
        }
        order_candidates(&mut candidates, &mut *self.rng, |c| totals[c.index()]);
        candidates
    }

    /// Domain size of `id`, served from the cache when enabled.
    fn domain(&mut self, id: EntrantId) -> DomainSize {
        if !self.config.memoize_domains {
            return self.fresh_domain(id);
        }
        let entrant = self.registry.get(id);
        let (home, away) = (entrant.home_count(), entrant.away_count());
        if let Some(size) = self.cache.get(id, home, away) {
            return size;
        }
        let size = self.fresh_domain(id);
        self.cache.insert(id, home, away, size);
        size
    }

    fn fresh_domain(&self, id: EntrantId) -> DomainSize {
        self.engine
            .domain_size(&*self.registry, id, self.order.iter().copied())
    }

    /// Candidate roles of both sides of `pairing` towards `id`.
    fn status(&self, id: EntrantId, pairing: Pairing) -> [(bool, bool); 2] {
        let registry = &*self.registry;
        [
            self.engine.candidate_roles(registry, id, pairing.home),
            self.engine.candidate_roles(registry, id, pairing.away),
        ]
    }

    /// Cached entrants outside `pairing` with their current status.
    ///
    /// An untouched entrant's own counts do not change, so its domain can
    /// only change through the candidate status of the two touched ones.
    fn dependents(&self, pairing: Pairing) -> Vec<(EntrantId, [(bool, bool); 2])> {
        self.cache
            .entrants()
            .filter(|&id| id != pairing.home && id != pairing.away)
            .map(|id| (id, self.status(id, pairing)))
            .collect()
    }

    fn invalidate(&mut self, pairing: Pairing, before: Vec<(EntrantId, [(bool, bool); 2])>) {
        self.cache.invalidate(pairing.home);
        self.cache.invalidate(pairing.away);
        for (id, status) in before {
            if self.status(id, pairing) != status {
                self.cache.invalidate(id);
            }
        }
    }

    fn apply(&mut self, pairing: Pairing) {
        let before = self.dependents(pairing);
        self.registry.apply(pairing);
        self.invalidate(pairing, before);
        self.assignments += 1;
        log::trace!(
            "Assign {} vs {}",
            self.registry.get(pairing.home).label(),
            self.registry.get(pairing.away).label()
        );
    }

    fn undo(&mut self, pairing: Pairing) {
        let before = self.dependents(pairing);
        self.registry.undo(pairing);
        self.invalidate(pairing, before);
        self.backtracks += 1;

        let interval = self.config.progress_interval;
        if interval > 0 && self.backtracks % interval == 0 {
            let assigned = self.registry.assigned_slots() / 2;
            log::debug!(
                "Search progress: {} backtracks, {} fixtures assigned",
                self.backtracks,
                assigned
            );
        }
    }
}
