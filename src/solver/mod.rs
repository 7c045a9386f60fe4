//! Backtracking draw solver.
//!
//! # Algorithm
//!
//! 1. Seed order: entrants grouped by pot, each group shuffled.
//! 2. Forward checking: fail as soon as an incomplete entrant has fewer
//!    candidates in a role than matches it still needs there, or fewer
//!    reachable opponents under the affiliation and pot limits than it
//!    needs overall.
//! 3. MRV: pick the incomplete entrant with the fewest candidates; ties go
//!    to the seed order.
//! 4. Roles: home before away.
//! 5. Values: bidirectionally valid candidates, shuffled, then most
//!    constrained first.
//! 6. Apply, recurse, undo on failure. Every undo counts as a backtrack.
//! 7. A backtrack budget bounds the search; exceeding it aborts every
//!    pending level.
//!
//! The registry is mutated in place and every failed branch is reverted,
//! so a failed search leaves all opponent lists empty.
//!
//! # Reference
//! Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach",
//! Ch. 6: Constraint Satisfaction Problems

mod domain;
mod ordering;
mod search;

pub use domain::DomainCache;
pub use ordering::{order_candidates, seed_order};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintEngine;
use crate::models::{CompetitionProfile, EntrantRegistry};

use search::Search;

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Backtracks allowed before the search gives up.
    pub max_backtracks: u64,
    /// Memoize domain sizes between recursion steps. The cache is exact,
    /// so this changes speed only, never the draw.
    pub memoize_domains: bool,
    /// Log progress every this many backtracks (0 = never).
    pub progress_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_backtracks: 50_000,
            memoize_domains: true,
            progress_interval: 500,
        }
    }
}

impl SolverConfig {
    /// Sets the backtrack budget.
    pub fn with_max_backtracks(mut self, max: u64) -> Self {
        self.max_backtracks = max;
        self
    }

    /// Enables or disables domain memoization.
    pub fn with_memoization(mut self, enabled: bool) -> Self {
        self.memoize_domains = enabled;
        self
    }

    /// Sets the progress log interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Terminal state of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// Every entrant has its full set of opponents.
    Solved,
    /// Every branch was refuted.
    DeadEnd,
    /// The backtrack budget ran out.
    Exhausted,
}

impl SearchOutcome {
    pub fn is_solved(self) -> bool {
        self == SearchOutcome::Solved
    }
}

/// Result of one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Undo operations performed.
    pub backtracks: u64,
    /// Apply operations performed.
    pub assignments: u64,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        self.outcome.is_solved()
    }
}

/// Depth-first draw solver over a mutable registry.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_draw::models::{CompetitionProfile, EntrantRegistry, EntrantSeed};
/// use u_draw::solver::BacktrackSolver;
///
/// let seeds: Vec<_> = ["NED", "SCO", "FRA", "AUT"]
///     .iter()
///     .map(|c| EntrantSeed::new(format!("Club {c}"), *c))
///     .collect();
/// let mut registry = EntrantRegistry::from_seeds(&seeds);
/// let profile = CompetitionProfile::new(1, 1, 1);
///
/// let report = BacktrackSolver::new(&profile)
///     .solve(&mut registry, &mut ChaCha8Rng::seed_from_u64(1));
/// assert!(report.is_solved());
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackSolver<'p> {
    profile: &'p CompetitionProfile,
    config: SolverConfig,
}

impl<'p> BacktrackSolver<'p> {
    /// Creates a solver with the default configuration.
    pub fn new(profile: &'p CompetitionProfile) -> Self {
        Self {
            profile,
            config: SolverConfig::default(),
        }
    }

    /// Sets the search parameters.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs the search on `registry`, starting from its current lists.
    ///
    /// On [`SearchOutcome::Solved`] the registry holds the draw; otherwise
    /// it is back in its starting state.
    pub fn solve<R: Rng + ?Sized>(&self, registry: &mut EntrantRegistry, rng: &mut R) -> SearchReport {
        let order = seed_order(registry, rng);
        log::debug!(
            "Starting draw search: {} entrants, budget {} backtracks",
            order.len(),
            self.config.max_backtracks
        );

        let engine = ConstraintEngine::new(self.profile);
        let mut search = Search::new(engine, &self.config, registry, order, rng);
        let outcome = search.run();
        let report = search.report(outcome);

        match outcome {
            SearchOutcome::Solved => log::info!(
                "Draw complete after {} backtracks ({} assignments)",
                report.backtracks,
                report.assignments
            ),
            SearchOutcome::DeadEnd => log::info!(
                "Draw infeasible after {} backtracks",
                report.backtracks
            ),
            SearchOutcome::Exhausted => log::info!(
                "Draw search exhausted after {} backtracks",
                report.backtracks
            ),
        }

        report
    }
}
