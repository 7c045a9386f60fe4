//! Draw domain models.
//!
//! Provides the data types for representing a draw: who takes part, under
//! which format, and what came out of it.
//!
//! # Domain Mappings
//!
//! | u-draw | Club competition | Tournament | Scheduling analogy |
//! |--------|------------------|------------|--------------------|
//! | Entrant | Club | Player/Team | Task |
//! | Affiliation | Country association | Club/Federation | Resource group |
//! | Pot | Seeding pot | Rating band | Priority class |
//! | Fixture | Match | Game | Assignment |

mod entrant;
mod fixture;
mod profile;
mod registry;

pub use entrant::{Entrant, EntrantId, EntrantSeed};
pub use fixture::{Fixture, Violation, ViolationType};
pub use profile::{Competition, CompetitionProfile};
pub use registry::{EntrantRegistry, Pairing};
