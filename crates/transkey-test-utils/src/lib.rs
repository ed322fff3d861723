//! Test helpers shared across transkey crates.

pub mod plural;
pub mod resources;

pub use plural::StubPluralRules;
pub use resources::{engine_with, sample_resources};
