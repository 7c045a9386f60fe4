//! Pairing constraints.
//!
//! Pure predicates over the current registry state: whether two entrants
//! can meet in a given role, which candidates survive that test in both
//! directions, and how many candidates an entrant has left. Nothing here
//! mutates state.
//!
//! Rules checked by [`ConstraintEngine::can_pair`]:
//! - An entrant never faces itself.
//! - Entrants of the same affiliation never meet.
//! - Two entrants meet at most once.
//! - An entrant draws at most `max_same_affiliation` opponents from one
//!   affiliation (checked for both sides).
//! - Home and away quotas are never exceeded.
//! - When the profile sets `max_same_pot`, an entrant draws at most that
//!   many opponents from one pot.
//!
//! [`validate_final_draw`] audits a finished draw independently of the
//! search.

mod audit;

pub use audit::validate_final_draw;

use std::collections::BTreeMap;

use crate::models::{CompetitionProfile, EntrantId, EntrantRegistry};

/// Outcome of a single pairing check.
pub type PairingResult = Result<(), Rejection>;

/// Why a pairing was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Both sides are the same entrant.
    SameEntrant,
    /// Both sides share an affiliation.
    SameAffiliation,
    /// The two entrants already meet.
    AlreadyPaired,
    /// `entrant` already has the maximum opponents from `affiliation`.
    AffiliationLimit {
        entrant: EntrantId,
        affiliation: String,
    },
    /// `entrant` has no home slot left.
    HomeFull(EntrantId),
    /// `entrant` has no away slot left.
    AwayFull(EntrantId),
    /// `entrant` already has the maximum opponents from `pot`.
    PotLimit { entrant: EntrantId, pot: u32 },
}

impl Rejection {
    /// Short reason tag for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::SameEntrant => "same entrant",
            Rejection::SameAffiliation => "same affiliation",
            Rejection::AlreadyPaired => "already paired",
            Rejection::AffiliationLimit { .. } => "affiliation limit",
            Rejection::HomeFull(_) => "home matches full",
            Rejection::AwayFull(_) => "away matches full",
            Rejection::PotLimit { .. } => "pot limit",
        }
    }

    /// Whether the refusal comes from a filled quota rather than a
    /// grouping rule.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Rejection::HomeFull(_) | Rejection::AwayFull(_))
    }
}

/// Remaining valid candidates per role.
///
/// A role the entrant no longer needs always counts zero. `reach` is the
/// number of distinct opponents still attainable once the affiliation and
/// pot limits are applied to the candidate set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainSize {
    pub home: usize,
    pub away: usize,
    pub reach: usize,
}

impl DomainSize {
    /// Candidates over both roles.
    #[inline]
    pub fn total(&self) -> usize {
        self.home + self.away
    }
}

/// Constraint checks for one competition profile.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEngine<'p> {
    profile: &'p CompetitionProfile,
}

impl<'p> ConstraintEngine<'p> {
    pub fn new(profile: &'p CompetitionProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'p CompetitionProfile {
        self.profile
    }

    /// Checks whether `a` can meet `b`, with `a` at home when `as_home`.
    pub fn can_pair(
        &self,
        registry: &EntrantRegistry,
        a: EntrantId,
        b: EntrantId,
        as_home: bool,
    ) -> PairingResult {
        if a == b {
            return Err(Rejection::SameEntrant);
        }

        let ea = registry.get(a);
        let eb = registry.get(b);

        if ea.affiliation == eb.affiliation {
            return Err(Rejection::SameAffiliation);
        }

        if ea.has_opponent(b) {
            return Err(Rejection::AlreadyPaired);
        }

        let limit = self.profile.max_same_affiliation;
        if registry.affiliation_count(a, &eb.affiliation) >= limit {
            return Err(Rejection::AffiliationLimit {
                entrant: a,
                affiliation: eb.affiliation.clone(),
            });
        }
        if registry.affiliation_count(b, &ea.affiliation) >= limit {
            return Err(Rejection::AffiliationLimit {
                entrant: b,
                affiliation: ea.affiliation.clone(),
            });
        }

        if as_home {
            if ea.home_count() >= self.profile.home_quota {
                return Err(Rejection::HomeFull(a));
            }
            if eb.away_count() >= self.profile.away_quota {
                return Err(Rejection::AwayFull(b));
            }
        } else {
            if ea.away_count() >= self.profile.away_quota {
                return Err(Rejection::AwayFull(a));
            }
            if eb.home_count() >= self.profile.home_quota {
                return Err(Rejection::HomeFull(b));
            }
        }

        if let Some(max_pot) = self.profile.max_same_pot {
            if registry.pot_count(a, eb.pot) >= max_pot {
                return Err(Rejection::PotLimit {
                    entrant: a,
                    pot: eb.pot,
                });
            }
        }

        Ok(())
    }

    /// `can_pair` from `entrant`'s side and the reverse check from the
    /// candidate's side.
    pub fn can_pair_both(
        &self,
        registry: &EntrantRegistry,
        entrant: EntrantId,
        candidate: EntrantId,
        as_home: bool,
    ) -> bool {
        self.can_pair(registry, entrant, candidate, as_home).is_ok()
            && self
                .can_pair(registry, candidate, entrant, !as_home)
                .is_ok()
    }

    /// Candidates from `pool` that `entrant` can meet in the given role,
    /// checked in both directions. Pool order is preserved.
    pub fn valid_candidates<I>(
        &self,
        registry: &EntrantRegistry,
        entrant: EntrantId,
        pool: I,
        as_home: bool,
    ) -> Vec<EntrantId>
    where
        I: IntoIterator<Item = EntrantId>,
    {
        pool.into_iter()
            .filter(|&c| self.can_pair_both(registry, entrant, c, as_home))
            .collect()
    }

    /// Roles in which `other` is a valid candidate for `entrant`, as
    /// `(home, away)`. Only roles `entrant` still needs are considered;
    /// `entrant` itself and complete entrants are never candidates.
    pub fn candidate_roles(&self, registry: &EntrantRegistry, entrant: EntrantId, other: EntrantId) -> (bool, bool) {
        if other == entrant || registry.get(other).is_complete(self.profile) {
            return (false, false);
        }
        let e = registry.get(entrant);
        let home = e.needs_home(self.profile) > 0 && self.can_pair_both(registry, entrant, other, true);
        let away = e.needs_away(self.profile) > 0 && self.can_pair_both(registry, entrant, other, false);
        (home, away)
    }

    /// Counts valid candidates among the incomplete members of `pool`,
    /// for each role `entrant` still needs, and their reach under the
    /// grouping limits.
    pub fn domain_size<I>(&self, registry: &EntrantRegistry, entrant: EntrantId, pool: I) -> DomainSize
    where
        I: IntoIterator<Item = EntrantId>,
    {
        let mut size = DomainSize::default();
        let mut by_affiliation: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_pot: BTreeMap<u32, usize> = BTreeMap::new();

        for other in pool {
            let (home, away) = self.candidate_roles(registry, entrant, other);
            if home {
                size.home += 1;
            }
            if away {
                size.away += 1;
            }
            if home || away {
                let o = registry.get(other);
                *by_affiliation.entry(o.affiliation.as_str()).or_insert(0) += 1;
                *by_pot.entry(o.pot).or_insert(0) += 1;
            }
        }

        // Same bound as the input reach check, on the live candidate set
        let limit = self.profile.max_same_affiliation;
        size.reach = by_affiliation
            .iter()
            .map(|(&affiliation, &n)| {
                n.min(limit.saturating_sub(registry.affiliation_count(entrant, affiliation)))
            })
            .sum();
        if let Some(max_pot) = self.profile.max_same_pot {
            let pot_reach: usize = by_pot
                .iter()
                .map(|(&pot, &n)| n.min(max_pot.saturating_sub(registry.pot_count(entrant, pot))))
                .sum();
            size.reach = size.reach.min(pot_reach);
        }

        size
    }

    /// Whether `entrant` can no longer fill its quotas from `size`: a
    /// needed role has fewer candidates than missing matches, or the
    /// grouping limits leave fewer reachable opponents than it needs.
    pub fn is_starved(&self, registry: &EntrantRegistry, entrant: EntrantId, size: DomainSize) -> bool {
        let e = registry.get(entrant);
        let needs_home = e.needs_home(self.profile);
        let needs_away = e.needs_away(self.profile);
        needs_home > size.home || needs_away > size.away || needs_home + needs_away > size.reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntrantSeed, Pairing};

    fn registry() -> EntrantRegistry {
        EntrantRegistry::from_seeds(&[
            EntrantSeed::new("FC Porto", "POR").with_pot(1),      // 0
            EntrantSeed::new("Benfica", "POR").with_pot(2),       // 1
            EntrantSeed::new("Real Madrid", "ESP").with_pot(1),   // 2
            EntrantSeed::new("Barcelona", "ESP").with_pot(2),     // 3
            EntrantSeed::new("Atletico Madrid", "ESP").with_pot(3), // 4
            EntrantSeed::new("Celtic", "SCO").with_pot(3),        // 5
        ])
    }

    fn id(i: usize) -> EntrantId {
        EntrantId(i)
    }

    #[test]
    fn test_same_entrant() {
        let profile = CompetitionProfile::new(4, 4, 2);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();
        assert_eq!(
            engine.can_pair(&reg, id(0), id(0), true),
            Err(Rejection::SameEntrant)
        );
    }

    #[test]
    fn test_same_affiliation() {
        let profile = CompetitionProfile::new(4, 4, 2);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();
        let result = engine.can_pair(&reg, id(0), id(1), true);
        assert_eq!(result, Err(Rejection::SameAffiliation));
        assert_eq!(result.unwrap_err().reason(), "same affiliation");
    }

    #[test]
    fn test_valid_pair() {
        let profile = CompetitionProfile::new(4, 4, 2);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();
        assert!(engine.can_pair(&reg, id(0), id(2), true).is_ok());
        assert!(engine.can_pair(&reg, id(2), id(0), false).is_ok());
    }

    #[test]
    fn test_already_paired() {
        let profile = CompetitionProfile::new(4, 4, 2);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        reg.apply(Pairing::new(id(0), id(2)));

        assert_eq!(
            engine.can_pair(&reg, id(0), id(2), false),
            Err(Rejection::AlreadyPaired)
        );
        assert_eq!(
            engine.can_pair(&reg, id(2), id(0), true),
            Err(Rejection::AlreadyPaired)
        );
    }

    #[test]
    fn test_affiliation_limit_own_side() {
        let profile = CompetitionProfile::new(4, 4, 2);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        // Porto already has two Spanish opponents
        reg.apply(Pairing::new(id(0), id(2)));
        reg.apply(Pairing::new(id(3), id(0)));

        assert_eq!(
            engine.can_pair(&reg, id(0), id(4), true),
            Err(Rejection::AffiliationLimit {
                entrant: id(0),
                affiliation: "ESP".into(),
            })
        );
    }

    #[test]
    fn test_affiliation_limit_other_side() {
        let profile = CompetitionProfile::new(4, 4, 1);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        // Real Madrid already faces a Portuguese side
        reg.apply(Pairing::new(id(2), id(1)));

        assert_eq!(
            engine.can_pair(&reg, id(0), id(2), true),
            Err(Rejection::AffiliationLimit {
                entrant: id(2),
                affiliation: "POR".into(),
            })
        );
    }

    #[test]
    fn test_home_away_capacity() {
        let profile = CompetitionProfile::new(1, 1, 2);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        reg.apply(Pairing::new(id(0), id(2)));

        // Porto's single home slot is taken
        let r = engine.can_pair(&reg, id(0), id(5), true);
        assert_eq!(r, Err(Rejection::HomeFull(id(0))));
        assert!(r.unwrap_err().is_capacity());
        // Real Madrid's single away slot is taken
        assert_eq!(
            engine.can_pair(&reg, id(5), id(2), true),
            Err(Rejection::AwayFull(id(2)))
        );
        // Porto can still travel, Celtic can still host
        assert!(engine.can_pair(&reg, id(0), id(5), false).is_ok());
    }

    #[test]
    fn test_pot_limit_only_when_configured() {
        let mut reg = registry();
        // Celtic hosts a pot-1 side
        reg.apply(Pairing::new(id(5), id(0)));

        let open = CompetitionProfile::new(4, 4, 2);
        assert!(ConstraintEngine::new(&open)
            .can_pair(&reg, id(5), id(2), true)
            .is_ok());

        let capped = CompetitionProfile::new(4, 4, 2).with_max_same_pot(1);
        assert_eq!(
            ConstraintEngine::new(&capped).can_pair(&reg, id(5), id(2), true),
            Err(Rejection::PotLimit {
                entrant: id(5),
                pot: 1
            })
        );
    }

    #[test]
    fn test_valid_candidates_is_bidirectional() {
        let profile = CompetitionProfile::new(4, 4, 2).with_max_same_pot(1);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        // Real Madrid (pot 1) already has a pot-3 opponent
        reg.apply(Pairing::new(id(2), id(5)));

        // Celtic passes from Porto's side but is refused from its own: it
        // already has a pot-1 opponent.
        let pool = reg.ids().collect::<Vec<_>>();
        assert!(engine.can_pair(&reg, id(0), id(5), true).is_ok());
        assert_eq!(
            engine.can_pair(&reg, id(5), id(0), false),
            Err(Rejection::PotLimit {
                entrant: id(5),
                pot: 1
            })
        );

        let candidates = engine.valid_candidates(&reg, id(0), pool, true);
        assert_eq!(candidates, vec![id(2), id(3), id(4)]);
    }

    #[test]
    fn test_domain_size_and_starvation() {
        let profile = CompetitionProfile::new(1, 1, 2);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();

        // Celtic can face any of the other five, in either role, but only
        // two of the three Spanish sides
        let pool = reg.ids().collect::<Vec<_>>();
        let size = engine.domain_size(&reg, id(5), pool);
        assert_eq!(size, DomainSize { home: 5, away: 5, reach: 4 });
        assert_eq!(size.total(), 10);
        assert!(!engine.is_starved(&reg, id(5), size));

        reg.apply(Pairing::new(id(5), id(0)));
        let pool = reg.ids().collect::<Vec<_>>();
        let size = engine.domain_size(&reg, id(5), pool);
        // Home is full; Porto is already an opponent; one Portuguese slot left
        assert_eq!(size, DomainSize { home: 0, away: 4, reach: 3 });
        assert!(!engine.is_starved(&reg, id(5), size));
        assert!(engine.is_starved(
            &reg,
            id(5),
            DomainSize {
                home: 3,
                away: 0,
                reach: 3
            }
        ));
    }

    #[test]
    fn test_starved_by_role_count() {
        let profile = CompetitionProfile::new(2, 2, 2);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();
        // Two home matches missing, one home candidate left
        let size = DomainSize {
            home: 1,
            away: 4,
            reach: 4,
        };
        assert!(engine.is_starved(&reg, id(5), size));
    }

    #[test]
    fn test_starved_by_affiliation_reach() {
        // Four opponents needed, but only one Portuguese and one Spanish
        // side may be drawn
        let profile = CompetitionProfile::new(2, 2, 1);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();

        let size = engine.domain_size(&reg, id(5), reg.ids().collect::<Vec<_>>());
        assert_eq!(size, DomainSize { home: 5, away: 5, reach: 2 });
        assert!(engine.is_starved(&reg, id(5), size));
    }

    #[test]
    fn test_starved_by_pot_reach() {
        // One opponent per pot over three pots, four needed
        let profile = CompetitionProfile::new(2, 2, 2).with_max_same_pot(1);
        let engine = ConstraintEngine::new(&profile);
        let reg = registry();

        let size = engine.domain_size(&reg, id(5), reg.ids().collect::<Vec<_>>());
        assert_eq!(size.reach, 3);
        assert!(engine.is_starved(&reg, id(5), size));

        let open = CompetitionProfile::new(2, 2, 2);
        let size = ConstraintEngine::new(&open).domain_size(&reg, id(5), reg.ids().collect::<Vec<_>>());
        assert_eq!(size.reach, 4);
        assert!(!ConstraintEngine::new(&open).is_starved(&reg, id(5), size));
    }

    #[test]
    fn test_candidate_roles() {
        let profile = CompetitionProfile::new(1, 1, 2);
        let engine = ConstraintEngine::new(&profile);
        let mut reg = registry();
        assert_eq!(engine.candidate_roles(&reg, id(0), id(0)), (false, false));
        assert_eq!(engine.candidate_roles(&reg, id(0), id(1)), (false, false));
        assert_eq!(engine.candidate_roles(&reg, id(0), id(5)), (true, true));

        // Porto hosts Real: Porto only needs an away match now, and Real is
        // no longer a candidate at all
        reg.apply(Pairing::new(id(0), id(2)));
        assert_eq!(engine.candidate_roles(&reg, id(0), id(5)), (false, true));
        assert_eq!(engine.candidate_roles(&reg, id(0), id(2)), (false, false));
    }
}
