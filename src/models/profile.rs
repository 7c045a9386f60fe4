//! Competition profiles.
//!
//! A profile is a plain configuration record describing how many matches
//! each entrant plays and which grouping limits apply. Competition variants
//! differ only in these numbers, so they are presets rather than subtypes.

use serde::{Deserialize, Serialize};

/// Match quotas and grouping limits for one competition format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionProfile {
    /// Human-readable format name.
    #[serde(default)]
    pub name: String,
    /// Total matches per entrant.
    pub matches_per_entrant: usize,
    /// Home matches per entrant.
    pub home_quota: usize,
    /// Away matches per entrant.
    pub away_quota: usize,
    /// Maximum opponents an entrant may draw from one affiliation.
    pub max_same_affiliation: usize,
    /// Maximum opponents an entrant may draw from one pot. `None` = no limit.
    #[serde(default)]
    pub max_same_pot: Option<usize>,
}

impl CompetitionProfile {
    /// Creates a profile; `matches_per_entrant` is `home_quota + away_quota`.
    pub fn new(home_quota: usize, away_quota: usize, max_same_affiliation: usize) -> Self {
        Self {
            name: String::new(),
            matches_per_entrant: home_quota + away_quota,
            home_quota,
            away_quota,
            max_same_affiliation,
            max_same_pot: None,
        }
    }

    /// Sets the format name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides the total match count.
    ///
    /// Input validation rejects profiles where this disagrees with the
    /// quotas.
    pub fn with_matches_per_entrant(mut self, matches: usize) -> Self {
        self.matches_per_entrant = matches;
        self
    }

    /// Caps opponents drawn from a single pot.
    pub fn with_max_same_pot(mut self, max: usize) -> Self {
        self.max_same_pot = Some(max);
        self
    }

    /// Number of fixtures a complete draw over `entrants` contains.
    pub fn expected_fixtures(&self, entrants: usize) -> usize {
        entrants * self.home_quota
    }
}

/// Continental club competitions with a known draw format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competition {
    ChampionsLeague,
    EuropaLeague,
    ConferenceLeague,
}

impl Competition {
    /// All known competitions.
    pub const ALL: [Competition; 3] = [
        Competition::ChampionsLeague,
        Competition::EuropaLeague,
        Competition::ConferenceLeague,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Competition::ChampionsLeague => "Champions League",
            Competition::EuropaLeague => "Europa League",
            Competition::ConferenceLeague => "Conference League",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Competition::ChampionsLeague => "CL",
            Competition::EuropaLeague => "EL",
            Competition::ConferenceLeague => "ECL",
        }
    }

    /// League-phase draw profile.
    ///
    /// | Competition | Matches | Home/Away | Per affiliation | Per pot |
    /// |-------------|---------|-----------|-----------------|---------|
    /// | CL | 8 | 4/4 | 2 | 2 |
    /// | EL | 8 | 4/4 | 2 | - |
    /// | ECL | 6 | 3/3 | 2 | - |
    pub fn profile(self) -> CompetitionProfile {
        match self {
            Competition::ChampionsLeague => CompetitionProfile::new(4, 4, 2)
                .with_name(self.display_name())
                .with_max_same_pot(2),
            Competition::EuropaLeague => {
                CompetitionProfile::new(4, 4, 2).with_name(self.display_name())
            }
            Competition::ConferenceLeague => {
                CompetitionProfile::new(3, 3, 2).with_name(self.display_name())
            }
        }
    }
}
