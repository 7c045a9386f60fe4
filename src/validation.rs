//! Input validation for draws.
//!
//! Checks that entrant seeds and the competition profile can possibly
//! produce a complete draw before any search starts. Detects:
//! - Empty names and duplicate (name, affiliation) identities
//! - Quotas that disagree with the match total
//! - Home and away quotas that cannot balance
//! - Too few entrants for the required number of distinct opponents
//! - Affiliations whose members cannot reach enough opponents under the
//!   per-affiliation limit
//! - Pots whose members cannot reach enough opponents under the per-pot
//!   limit
//!
//! These are necessary conditions only: passing them does not guarantee a
//! draw exists.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::models::{CompetitionProfile, EntrantSeed};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An entrant has an empty name or affiliation.
    EmptyName,
    /// Two entrants share the same (name, affiliation) identity.
    DuplicateEntrant,
    /// `home_quota + away_quota` differs from `matches_per_entrant`.
    InconsistentQuotas,
    /// Home and away quotas differ, so total home slots cannot match
    /// total away slots.
    UnbalancedQuotas,
    /// Fewer entrants than `matches_per_entrant + 1`.
    InsufficientEntrants,
    /// Members of an affiliation cannot reach enough opponents.
    InsufficientOpponents,
    /// Members of a pot cannot reach enough opponents.
    InsufficientPotCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a draw.
///
/// Checks:
/// 1. Every entrant has a name and an affiliation
/// 2. No duplicate (name, affiliation) pairs
/// 3. `home_quota + away_quota == matches_per_entrant`
/// 4. `home_quota == away_quota`
/// 5. At least `matches_per_entrant + 1` entrants
/// 6. Per affiliation: Σ over other affiliations of
///    `min(size, max_same_affiliation)` ≥ `matches_per_entrant`
/// 7. Per pot, when `max_same_pot` is set: Σ over pots of
///    `min(reachable members, max_same_pot)` ≥ `matches_per_entrant`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(seeds: &[EntrantSeed], profile: &CompetitionProfile) -> ValidationResult {
    let mut errors = Vec::new();
    let matches = profile.matches_per_entrant;

    let mut identities = HashSet::new();
    for seed in seeds {
        if seed.name.trim().is_empty() || seed.affiliation.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!(
                    "Entrant '{}' ({}) has an empty name or affiliation",
                    seed.name, seed.affiliation
                ),
            ));
        }
        if !identities.insert((seed.name.as_str(), seed.affiliation.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEntrant,
                format!("Duplicate entrant: {} ({})", seed.name, seed.affiliation),
            ));
        }
    }

    if profile.home_quota + profile.away_quota != matches {
        errors.push(ValidationError::new(
            ValidationErrorKind::InconsistentQuotas,
            format!(
                "Quotas {} home + {} away do not add up to {} matches",
                profile.home_quota, profile.away_quota, matches
            ),
        ));
    }

    if profile.home_quota != profile.away_quota {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnbalancedQuotas,
            format!(
                "Home quota {} differs from away quota {}",
                profile.home_quota, profile.away_quota
            ),
        ));
    }

    if matches == 0 {
        return finish(errors);
    }

    if seeds.len() < matches + 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientEntrants,
            format!(
                "{} entrants cannot provide {} distinct opponents each",
                seeds.len(),
                matches
            ),
        ));
    }

    // Affiliation reach
    let mut affiliation_sizes: BTreeMap<&str, usize> = BTreeMap::new();
    for seed in seeds {
        *affiliation_sizes.entry(seed.affiliation.as_str()).or_insert(0) += 1;
    }
    for &affiliation in affiliation_sizes.keys() {
        let reach: usize = affiliation_sizes
            .iter()
            .filter(|(other, _)| **other != affiliation)
            .map(|(_, &size)| size.min(profile.max_same_affiliation))
            .sum();
        if reach < matches {
            errors.push(ValidationError::new(
                ValidationErrorKind::InsufficientOpponents,
                format!(
                    "Entrants from {affiliation} can reach only {reach} opponents, {matches} required"
                ),
            ));
        }
    }

    // Pot reach
    if let Some(max_pot) = profile.max_same_pot {
        let mut pot_sizes: BTreeMap<u32, usize> = BTreeMap::new();
        for seed in seeds {
            *pot_sizes.entry(seed.pot).or_insert(0) += 1;
        }
        for &pot in pot_sizes.keys() {
            let reach: usize = pot_sizes
                .iter()
                .map(|(&other, &size)| {
                    let reachable = if other == pot { size - 1 } else { size };
                    reachable.min(max_pot)
                })
                .sum();
            if reach < matches {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InsufficientPotCapacity,
                    format!(
                        "Entrants from pot {pot} can reach only {reach} opponents, {matches} required"
                    ),
                ));
            }
        }
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
