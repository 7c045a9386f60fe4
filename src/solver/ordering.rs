//! Variable and value ordering.
//!
//! # Seed order
//! Entrants are grouped by pot (ascending) and each group is shuffled on
//! its own; the groups are then concatenated. This order breaks MRV ties.
//!
//! # Candidate order
//! Candidates are shuffled first and then stably sorted by their own
//! remaining domain, most constrained first, so equal counts keep the
//! shuffled order.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{EntrantId, EntrantRegistry};

/// Pot-grouped, per-group shuffled order of all entrants.
pub fn seed_order<R: Rng + ?Sized>(registry: &EntrantRegistry, rng: &mut R) -> Vec<EntrantId> {
    let mut by_pot: BTreeMap<u32, Vec<EntrantId>> = BTreeMap::new();
    for entrant in registry.entrants() {
        by_pot.entry(entrant.pot).or_default().push(entrant.id);
    }

    let mut order = Vec::with_capacity(registry.len());
    for (_, mut group) in by_pot {
        group.shuffle(rng);
        order.extend(group);
    }
    order
}

/// Shuffles `candidates`, then sorts them ascending by `remaining`.
pub fn order_candidates<R, F>(candidates: &mut [EntrantId], rng: &mut R, remaining: F)
where
    R: Rng + ?Sized,
    F: FnMut(&EntrantId) -> usize,
{
    candidates.shuffle(rng);
    candidates.sort_by_cached_key(remaining);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntrantSeed;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn registry() -> EntrantRegistry {
        EntrantRegistry::from_seeds(&[
            EntrantSeed::new("A", "X").with_pot(2),
            EntrantSeed::new("B", "Y").with_pot(1),
            EntrantSeed::new("C", "Z").with_pot(3),
            EntrantSeed::new("D", "W").with_pot(1),
            EntrantSeed::new("E", "V").with_pot(2),
            EntrantSeed::new("F", "U").with_pot(1),
        ])
    }

    #[test]
    fn test_seed_order_groups_pots() {
        let reg = registry();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let order = seed_order(&reg, &mut rng);

        assert_eq!(order.len(), 6);
        let pots: Vec<u32> = order.iter().map(|&id| reg.get(id).pot).collect();
        assert_eq!(pots, vec![1, 1, 1, 2, 2, 3]);

        let mut pot1: Vec<_> = order[..3].to_vec();
        pot1.sort();
        assert_eq!(pot1, vec![EntrantId(1), EntrantId(3), EntrantId(5)]);
    }

    #[test]
    fn test_seed_order_reproducible() {
        let reg = registry();
        let a = seed_order(&reg, &mut ChaCha8Rng::seed_from_u64(99));
        let b = seed_order(&reg, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_candidates_most_constrained_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut candidates: Vec<_> = (0..6).map(EntrantId).collect();
        // Remaining domain = id modulo 3
        order_candidates(&mut candidates, &mut rng, |id| id.index() % 3);

        let keys: Vec<_> = candidates.iter().map(|id| id.index() % 3).collect();
        assert_eq!(keys, vec![0, 0, 1, 1, 2, 2]);
    }
}
