//! Post-hoc audit of a finished draw.
//!
//! Re-checks every rule directly from the opponent lists, without any of
//! the search machinery, and collects all breaches instead of stopping at
//! the first one.

use std::collections::{BTreeMap, HashSet};

use crate::models::{CompetitionProfile, EntrantRegistry, Violation, ViolationType};

/// Audits `registry` as a final draw under `profile`.
///
/// Checks, per entrant:
/// 1. Home and away counts match the quotas
/// 2. No self pairing
/// 3. No opponent from the same affiliation
/// 4. No affiliation above `max_same_affiliation`
/// 5. No pot above `max_same_pot` (when set)
/// 6. No duplicate opponent
/// 7. Every home entry is mirrored by an away entry on the other side,
///    and vice versa
///
/// # Returns
/// `Ok(())` if the draw is valid, `Err(violations)` with every breach.
pub fn validate_final_draw(
    registry: &EntrantRegistry,
    profile: &CompetitionProfile,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    for entrant in registry.entrants() {
        let label = entrant.label();

        if entrant.home_count() != profile.home_quota {
            violations.push(Violation::new(
                ViolationType::HomeQuotaMismatch,
                &label,
                format!(
                    "{label}: {} home (expected {})",
                    entrant.home_count(),
                    profile.home_quota
                ),
            ));
        }
        if entrant.away_count() != profile.away_quota {
            violations.push(Violation::new(
                ViolationType::AwayQuotaMismatch,
                &label,
                format!(
                    "{label}: {} away (expected {})",
                    entrant.away_count(),
                    profile.away_quota
                ),
            ));
        }

        let mut by_affiliation: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_pot: BTreeMap<u32, usize> = BTreeMap::new();
        let mut seen = HashSet::new();

        for opp_id in entrant.opponents() {
            let opp = registry.get(opp_id);

            if opp_id == entrant.id {
                violations.push(Violation::new(
                    ViolationType::SelfPairing,
                    &label,
                    format!("{label} is listed as its own opponent"),
                ));
            } else if opp.affiliation == entrant.affiliation {
                violations.push(Violation::new(
                    ViolationType::SameAffiliation,
                    &label,
                    format!("{label} vs {}: same affiliation", opp.label()),
                ));
            }

            if !seen.insert(opp_id) {
                violations.push(Violation::new(
                    ViolationType::DuplicateOpponent,
                    &label,
                    format!("{label}: duplicate opponent {}", opp.label()),
                ));
            }

            *by_affiliation.entry(opp.affiliation.as_str()).or_insert(0) += 1;
            *by_pot.entry(opp.pot).or_insert(0) += 1;
        }

        for (affiliation, count) in by_affiliation {
            if count > profile.max_same_affiliation {
                violations.push(Violation::new(
                    ViolationType::AffiliationLimitExceeded,
                    &label,
                    format!("{label}: {count} opponents from {affiliation}"),
                ));
            }
        }

        if let Some(max_pot) = profile.max_same_pot {
            for (pot, count) in by_pot {
                if count > max_pot {
                    violations.push(Violation::new(
                        ViolationType::PotLimitExceeded,
                        &label,
                        format!("{label}: {count} opponents from pot {pot}"),
                    ));
                }
            }
        }

        for &opp_id in &entrant.home_opponents {
            if !registry.get(opp_id).away_opponents.contains(&entrant.id) {
                violations.push(Violation::new(
                    ViolationType::AsymmetricPairing,
                    &label,
                    format!(
                        "{label} hosts {} but is missing from its away list",
                        registry.get(opp_id).label()
                    ),
                ));
            }
        }
        for &opp_id in &entrant.away_opponents {
            if !registry.get(opp_id).home_opponents.contains(&entrant.id) {
                violations.push(Violation::new(
                    ViolationType::AsymmetricPairing,
                    &label,
                    format!(
                        "{label} visits {} but is missing from its home list",
                        registry.get(opp_id).label()
                    ),
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
