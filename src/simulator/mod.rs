//! Monte Carlo draw statistics.
//!
//! Repeats the draw many times on one RNG stream and measures how often
//! it succeeds and how often each pair of entrants is drawn together.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Success rate | Solved trials / trials |
//! | Mean backtracks | Mean backtrack count over solved trials |
//! | Pair frequency | Solved trials in which a pair meets |
//! | Share | Pair frequency / trials |
//!
//! # Reference
//! Robert & Casella (2004), "Monte Carlo Statistical Methods", Ch. 3

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::draw::assemble_fixtures;
use crate::models::{CompetitionProfile, EntrantId, EntrantRegistry};
use crate::solver::{BacktrackSolver, SolverConfig};

/// Trials between progress log lines.
const PROGRESS_EVERY: usize = 100;

/// How often one unordered pair met across a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFrequency {
    /// Smaller id of the pair.
    pub first: EntrantId,
    /// Larger id of the pair.
    pub second: EntrantId,
    /// Trials in which the pair met.
    pub count: u64,
    /// `count / trials`.
    pub share: f64,
}

impl PairFrequency {
    /// `"First - Second"` using registry names.
    pub fn describe(&self, registry: &EntrantRegistry) -> String {
        format!(
            "{} - {}",
            registry.get(self.first).name,
            registry.get(self.second).name
        )
    }
}

/// Aggregated simulation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub trials: usize,
    pub successes: usize,
    /// Fraction of solved trials (0.0..1.0).
    pub success_rate: f64,
    /// Mean backtracks over solved trials, 0 when none solved.
    pub mean_backtracks: f64,
    /// Sorted by count descending, then by pair.
    pub pair_frequencies: Vec<PairFrequency>,
}

impl SimulationReport {
    /// The `n` most frequent pairs.
    pub fn most_common(&self, n: usize) -> &[PairFrequency] {
        &self.pair_frequencies[..n.min(self.pair_frequencies.len())]
    }

    /// The `n` least frequent pairs that met at least once, rarest first.
    pub fn least_common(&self, n: usize) -> Vec<&PairFrequency> {
        self.pair_frequencies.iter().rev().take(n).collect()
    }

    /// Frequency entry of the pair `a`/`b`, in either order.
    pub fn frequency_of(&self, a: EntrantId, b: EntrantId) -> Option<&PairFrequency> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        self.pair_frequencies
            .iter()
            .find(|f| f.first == first && f.second == second)
    }
}

/// Runs repeated draws over one registry.
#[derive(Debug, Clone)]
pub struct Simulator<'p> {
    profile: &'p CompetitionProfile,
    trials: usize,
    config: SolverConfig,
}

impl<'p> Simulator<'p> {
    pub fn new(profile: &'p CompetitionProfile, trials: usize) -> Self {
        Self {
            profile,
            trials,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver parameters used for every trial.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs all trials.
    ///
    /// The registry is reset before each trial and holds the last trial's
    /// state afterwards.
    pub fn run<R: Rng + ?Sized>(&self, registry: &mut EntrantRegistry, rng: &mut R) -> SimulationReport {
        let solver = BacktrackSolver::new(self.profile).with_config(self.config.clone());
        let mut counts: BTreeMap<(EntrantId, EntrantId), u64> = BTreeMap::new();
        let mut successes = 0;
        let mut total_backtracks: u64 = 0;

        for trial in 1..=self.trials {
            registry.reset();
            let report = solver.solve(registry, rng);
            if report.is_solved() {
                successes += 1;
                total_backtracks += report.backtracks;
                for fixture in assemble_fixtures(registry) {
                    *counts.entry(fixture.unordered()).or_insert(0) += 1;
                }
            }

            if trial % PROGRESS_EVERY == 0 {
                log::debug!(
                    "Simulation progress: {trial}/{} trials, {successes} solved",
                    self.trials
                );
            }
        }

        let success_rate = if self.trials == 0 {
            0.0
        } else {
            successes as f64 / self.trials as f64
        };
        let mean_backtracks = if successes == 0 {
            0.0
        } else {
            total_backtracks as f64 / successes as f64
        };

        let mut pair_frequencies: Vec<PairFrequency> = counts
            .into_iter()
            .map(|((first, second), count)| PairFrequency {
                first,
                second,
                count,
                share: count as f64 / self.trials as f64,
            })
            .collect();
        // BTreeMap order already sorts by pair; the stable sort keeps it for ties
        pair_frequencies.sort_by(|a, b| b.count.cmp(&a.count));

        log::info!(
            "Simulation finished: {successes}/{} solved, {} distinct pairs",
            self.trials,
            pair_frequencies.len()
        );

        SimulationReport {
            trials: self.trials,
            successes,
            success_rate,
            mean_backtracks,
            pair_frequencies,
        }
    }
}
