//! Entrant (club) model.
//!
//! An entrant is one participant of the draw: a club with a fixed
//! affiliation (country), pot and coefficient, plus the two opponent
//! lists the solver fills in.
//!
//! Opponent lists hold [`EntrantId`]s into the owning
//! [`EntrantRegistry`](super::EntrantRegistry), never references, so the
//! home/away relation can be cyclic without cyclic ownership.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CompetitionProfile;

/// Index of an entrant within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntrantId(pub usize);

impl EntrantId {
    /// Position in the registry.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input record for one entrant, as produced by an external loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantSeed {
    /// Club name.
    pub name: String,
    /// Group code whose members may not face each other (e.g. "POR").
    pub affiliation: String,
    /// Pot / tier number.
    #[serde(default = "default_pot")]
    pub pot: u32,
    /// Strength coefficient. Informational only.
    #[serde(default)]
    pub coefficient: f64,
}

fn default_pot() -> u32 {
    1
}

impl EntrantSeed {
    /// Creates a seed in pot 1 with a zero coefficient.
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
            pot: default_pot(),
            coefficient: 0.0,
        }
    }

    /// Sets the pot.
    pub fn with_pot(mut self, pot: u32) -> Self {
        self.pot = pot;
        self
    }

    /// Sets the coefficient.
    pub fn with_coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }
}

/// A participant of the draw with its current opponent lists.
///
/// Identity is the (name, affiliation) pair; the registry guarantees it is
/// unique. During search only the opponent lists change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    /// Registry index.
    pub id: EntrantId,
    /// Club name.
    pub name: String,
    /// Affiliation (country) code.
    pub affiliation: String,
    /// Pot / tier number.
    pub pot: u32,
    /// Strength coefficient. Not consulted by any constraint.
    pub coefficient: f64,
    /// Opponents this entrant hosts, in assignment order.
    pub home_opponents: Vec<EntrantId>,
    /// Opponents this entrant visits, in assignment order.
    pub away_opponents: Vec<EntrantId>,
}

impl Entrant {
    /// Creates an entrant with empty opponent lists.
    pub fn from_seed(id: EntrantId, seed: &EntrantSeed) -> Self {
        Self {
            id,
            name: seed.name.clone(),
            affiliation: seed.affiliation.clone(),
            pot: seed.pot,
            coefficient: seed.coefficient,
            home_opponents: Vec::new(),
            away_opponents: Vec::new(),
        }
    }

    /// All assigned opponents, home first.
    pub fn opponents(&self) -> impl Iterator<Item = EntrantId> + '_ {
        self.home_opponents
            .iter()
            .chain(self.away_opponents.iter())
            .copied()
    }

    /// Whether `other` is already among this entrant's opponents.
    pub fn has_opponent(&self, other: EntrantId) -> bool {
        self.home_opponents.contains(&other) || self.away_opponents.contains(&other)
    }

    /// Number of home matches assigned.
    #[inline]
    pub fn home_count(&self) -> usize {
        self.home_opponents.len()
    }

    /// Number of away matches assigned.
    #[inline]
    pub fn away_count(&self) -> usize {
        self.away_opponents.len()
    }

    /// Home matches still missing under `profile`.
    pub fn needs_home(&self, profile: &CompetitionProfile) -> usize {
        profile.home_quota.saturating_sub(self.home_count())
    }

    /// Away matches still missing under `profile`.
    pub fn needs_away(&self, profile: &CompetitionProfile) -> usize {
        profile.away_quota.saturating_sub(self.away_count())
    }

    /// Whether both quotas are filled.
    pub fn is_complete(&self, profile: &CompetitionProfile) -> bool {
        self.needs_home(profile) == 0 && self.needs_away(profile) == 0
    }

    /// Display label, e.g. `"FC Porto (POR)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.affiliation)
    }

    /// Drops all assigned opponents.
    pub(crate) fn clear(&mut self) {
        self.home_opponents.clear();
        self.away_opponents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn porto() -> Entrant {
        Entrant::from_seed(
            EntrantId(0),
            &EntrantSeed::new("FC Porto", "POR")
                .with_pot(3)
                .with_coefficient(53.0),
        )
    }

    #[test]
    fn test_seed_builder() {
        let seed = EntrantSeed::new("Benfica", "POR")
            .with_pot(2)
            .with_coefficient(75.0);
        assert_eq!(seed.name, "Benfica");
        assert_eq!(seed.affiliation, "POR");
        assert_eq!(seed.pot, 2);
        assert!((seed.coefficient - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_seed_defaults_from_json() {
        let seed: EntrantSeed =
            serde_json::from_str(r#"{"name": "Celtic", "affiliation": "SCO"}"#).unwrap();
        assert_eq!(seed.pot, 1);
        assert_eq!(seed.coefficient, 0.0);
    }

    #[test]
    fn test_entrant_starts_empty() {
        let club = porto();
        assert_eq!(club.pot, 3);
        assert_eq!(club.home_count(), 0);
        assert_eq!(club.away_count(), 0);
        assert_eq!(club.opponents().count(), 0);
        assert_eq!(club.label(), "FC Porto (POR)");
    }

    #[test]
    fn test_needs_and_completion() {
        let profile = CompetitionProfile::new(2, 1, 2);
        let mut club = porto();
        assert_eq!(club.needs_home(&profile), 2);
        assert_eq!(club.needs_away(&profile), 1);
        assert!(!club.is_complete(&profile));

        club.home_opponents = vec![EntrantId(1), EntrantId(2)];
        club.away_opponents = vec![EntrantId(3)];
        assert_eq!(club.needs_home(&profile), 0);
        assert!(club.is_complete(&profile));
        assert!(club.has_opponent(EntrantId(3)));
        assert!(!club.has_opponent(EntrantId(4)));
        assert_eq!(
            club.opponents().collect::<Vec<_>>(),
            vec![EntrantId(1), EntrantId(2), EntrantId(3)]
        );
    }

    #[test]
    fn test_clear() {
        let mut club = porto();
        club.home_opponents.push(EntrantId(1));
        club.away_opponents.push(EntrantId(2));
        club.clear();
        assert_eq!(club.opponents().count(), 0);
    }
}
