//! League draw engine.
//!
//! Pairs every entrant of a league phase with a fixed number of home and
//! away opponents under grouping rules (no same-affiliation matches, a cap
//! per affiliation and optionally per pot) using randomized backtracking
//! search with forward checking and MRV ordering.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `EntrantSeed`, `Entrant`, `EntrantRegistry`,
//!   `CompetitionProfile`, `Fixture`, `Violation`
//! - **`validation`**: Input integrity checks run before any search
//! - **`constraint`**: Pairing predicates, domain sizes and the final audit
//! - **`solver`**: Backtracking search with a backtrack budget
//! - **`draw`**: Validate, solve and assemble fixtures in one call
//! - **`simulator`**: Monte Carlo success rates and pair frequencies
//! - **`error`**: `DrawError`
//!
//! # Randomness
//!
//! Every random choice comes from the `Rng` passed in by the caller. With
//! a seeded generator such as `rand_chacha::ChaCha8Rng`, the same input
//! always produces the same draw.
//!
//! # References
//!
//! - Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

pub mod constraint;
pub mod draw;
pub mod error;
pub mod models;
pub mod simulator;
pub mod solver;
pub mod validation;

pub use draw::{Draw, DrawResult};
pub use error::DrawError;
pub use models::{Competition, CompetitionProfile, EntrantSeed};
pub use simulator::{SimulationReport, Simulator};
pub use solver::{SearchOutcome, SolverConfig};
