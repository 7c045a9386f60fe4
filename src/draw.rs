//! Draw assembly.
//!
//! Ties the pieces together: validates the input, builds a fresh
//! registry, runs the solver and turns the filled registry into a fixture
//! list.
//!
//! # Example
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use u_draw::draw::Draw;
//! use u_draw::models::{CompetitionProfile, EntrantSeed};
//!
//! let seeds = vec![
//!     EntrantSeed::new("Ajax", "NED"),
//!     EntrantSeed::new("Celtic", "SCO"),
//!     EntrantSeed::new("Lille", "FRA"),
//!     EntrantSeed::new("Salzburg", "AUT"),
//! ];
//! let profile = CompetitionProfile::new(1, 1, 1);
//!
//! let result = Draw::new(&seeds, &profile)
//!     .run(&mut ChaCha8Rng::seed_from_u64(7))
//!     .unwrap();
//! assert!(result.success);
//! assert_eq!(result.fixture_count(), 4);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constraint::validate_final_draw;
use crate::error::DrawError;
use crate::models::{
    CompetitionProfile, EntrantId, EntrantRegistry, EntrantSeed, Fixture, Violation,
};
use crate::solver::{BacktrackSolver, SearchOutcome, SolverConfig};
use crate::validation::validate_input;

/// Emits one fixture per home-list entry, in registry order.
///
/// A pair that shows up twice (only possible in a corrupted registry) is
/// emitted once.
pub fn assemble_fixtures(registry: &EntrantRegistry) -> Vec<Fixture> {
    let mut seen = HashSet::new();
    let mut fixtures = Vec::new();
    for entrant in registry.entrants() {
        for &away in &entrant.home_opponents {
            let fixture = Fixture::new(entrant.id, away);
            if seen.insert(fixture.unordered()) {
                fixtures.push(fixture);
            }
        }
    }
    fixtures
}

/// Outcome of one draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    /// Final entrant state.
    pub registry: EntrantRegistry,
    /// Fixtures, empty unless the search succeeded.
    pub fixtures: Vec<Fixture>,
    pub success: bool,
    pub outcome: SearchOutcome,
    /// Backtracks spent by the search.
    pub backtracks: u64,
}

impl DrawResult {
    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    /// Fixtures involving `id`.
    pub fn fixtures_for(&self, id: EntrantId) -> Vec<Fixture> {
        self.fixtures
            .iter()
            .copied()
            .filter(|f| f.involves(id))
            .collect()
    }

    /// Names of the opponents `name` hosts, or `None` for an unknown name.
    pub fn home_opponents_of(&self, name: &str) -> Option<Vec<&str>> {
        let entrant = self.registry.find(name)?;
        Some(self.names(&entrant.home_opponents))
    }

    /// Names of the opponents `name` visits, or `None` for an unknown name.
    pub fn away_opponents_of(&self, name: &str) -> Option<Vec<&str>> {
        let entrant = self.registry.find(name)?;
        Some(self.names(&entrant.away_opponents))
    }

    /// Entrant ids grouped by pot, in registry order within each pot.
    pub fn by_pot(&self) -> BTreeMap<u32, Vec<EntrantId>> {
        let mut pots: BTreeMap<u32, Vec<EntrantId>> = BTreeMap::new();
        for entrant in self.registry.entrants() {
            pots.entry(entrant.pot).or_default().push(entrant.id);
        }
        pots
    }

    fn names(&self, ids: &[EntrantId]) -> Vec<&str> {
        ids.iter()
            .map(|&id| self.registry.get(id).name.as_str())
            .collect()
    }

    /// Audits the final registry against `profile`.
    ///
    /// Returns every violation found; an empty list means the draw is
    /// valid.
    pub fn validate(&self, profile: &CompetitionProfile) -> Vec<Violation> {
        match validate_final_draw(&self.registry, profile) {
            Ok(()) => Vec::new(),
            Err(violations) => violations,
        }
    }

    /// Turns an unsuccessful draw into an error.
    pub fn require_success(self) -> Result<Self, DrawError> {
        match self.outcome {
            SearchOutcome::Solved => Ok(self),
            SearchOutcome::Exhausted => Err(DrawError::SearchExhausted {
                attempts: 1,
                backtracks: self.backtracks,
            }),
            SearchOutcome::DeadEnd => Err(DrawError::Infeasible {
                backtracks: self.backtracks,
            }),
        }
    }
}

/// Draw runner over a set of seeds and one competition profile.
#[derive(Debug, Clone)]
pub struct Draw<'a> {
    seeds: &'a [EntrantSeed],
    profile: &'a CompetitionProfile,
    config: SolverConfig,
}

impl<'a> Draw<'a> {
    pub fn new(seeds: &'a [EntrantSeed], profile: &'a CompetitionProfile) -> Self {
        Self {
            seeds,
            profile,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver parameters.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the input and creates a registry with empty lists.
    pub fn build(&self) -> Result<EntrantRegistry, DrawError> {
        if let Err(errors) = validate_input(self.seeds, self.profile) {
            let count = errors.len();
            let err = DrawError::MalformedInput(errors);
            log::warn!("Draw input rejected with {count} problem(s): {err}");
            return Err(err);
        }
        Ok(EntrantRegistry::from_seeds(self.seeds))
    }

    /// Builds, solves and assembles one draw.
    ///
    /// An unsuccessful search is still `Ok`; see
    /// [`DrawResult::require_success`].
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DrawResult, DrawError> {
        let mut registry = self.build()?;
        Ok(self.solve(&mut registry, rng))
    }

    /// Runs up to `attempts` draws on the same RNG stream until one
    /// succeeds.
    ///
    /// A dead end is final: the search tree was fully explored, so a new
    /// seed cannot help.
    pub fn run_with_retries<R: Rng + ?Sized>(
        &self,
        attempts: usize,
        rng: &mut R,
    ) -> Result<DrawResult, DrawError> {
        let attempts = attempts.max(1);
        let mut registry = self.build()?;
        let mut backtracks = 0;

        for attempt in 1..=attempts {
            registry.reset();
            let result = self.solve(&mut registry, rng);
            backtracks += result.backtracks;
            match result.outcome {
                SearchOutcome::Solved => return Ok(result),
                SearchOutcome::DeadEnd => return Err(DrawError::Infeasible { backtracks }),
                SearchOutcome::Exhausted => {
                    log::debug!("Draw attempt {attempt}/{attempts} exhausted its budget");
                }
            }
        }

        Err(DrawError::SearchExhausted {
            attempts,
            backtracks,
        })
    }

    fn solve<R: Rng + ?Sized>(&self, registry: &mut EntrantRegistry, rng: &mut R) -> DrawResult {
        let pots: BTreeSet<u32> = registry.entrants().iter().map(|e| e.pot).collect();
        log::debug!(
            "Drawing {} ({} entrants, {} pots)",
            if self.profile.name.is_empty() {
                "draw"
            } else {
                self.profile.name.as_str()
            },
            registry.len(),
            pots.len()
        );

        let report = BacktrackSolver::new(self.profile)
            .with_config(self.config.clone())
            .solve(registry, rng);

        let fixtures = if report.is_solved() {
            assemble_fixtures(registry)
        } else {
            Vec::new()
        };

        DrawResult {
            registry: registry.clone(),
            fixtures,
            success: report.is_solved(),
            outcome: report.outcome,
            backtracks: report.backtracks,
        }
    }
}
