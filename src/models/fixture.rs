//! Fixture and violation models.
//!
//! A fixture is one concrete home/away match of a finished draw. A
//! violation is a rule breach found when auditing a draw after the fact.

use serde::{Deserialize, Serialize};

use super::{EntrantId, EntrantRegistry};

/// A home/away match derived from a completed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    /// Hosting entrant.
    pub home: EntrantId,
    /// Visiting entrant.
    pub away: EntrantId,
}

impl Fixture {
    pub fn new(home: EntrantId, away: EntrantId) -> Self {
        Self { home, away }
    }

    /// Identity pair with the smaller id first.
    pub fn unordered(&self) -> (EntrantId, EntrantId) {
        if self.home <= self.away {
            (self.home, self.away)
        } else {
            (self.away, self.home)
        }
    }

    /// Whether `id` plays in this fixture.
    pub fn involves(&self, id: EntrantId) -> bool {
        self.home == id || self.away == id
    }

    /// `"Home vs Away"` using registry names.
    pub fn describe(&self, registry: &EntrantRegistry) -> String {
        format!(
            "{} vs {}",
            registry.get(self.home).name,
            registry.get(self.away).name
        )
    }
}

/// A rule breach in a finished draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Label of the offending entrant.
    pub entrant: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of draw violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Home match count differs from the home quota.
    HomeQuotaMismatch,
    /// Away match count differs from the away quota.
    AwayQuotaMismatch,
    /// Entrant listed as its own opponent.
    SelfPairing,
    /// Two entrants of the same affiliation were paired.
    SameAffiliation,
    /// More opponents from one affiliation than allowed.
    AffiliationLimitExceeded,
    /// More opponents from one pot than allowed.
    PotLimitExceeded,
    /// The same opponent appears more than once.
    DuplicateOpponent,
    /// A home entry without the matching away entry on the other side.
    AsymmetricPairing,
}

impl Violation {
    pub fn new(
        violation_type: ViolationType,
        entrant: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entrant: entrant.into(),
            message: message.into(),
        }
    }

    /// Whether this is a home or away quota mismatch.
    pub fn is_quota_mismatch(&self) -> bool {
        matches!(
            self.violation_type,
            ViolationType::HomeQuotaMismatch | ViolationType::AwayQuotaMismatch
        )
    }
}
