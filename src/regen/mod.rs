//! # Regeneration
//!
//! Reconstructing instances from their persisted serializations while
//! tolerating schema drift. The engine reports, with path-level granularity,
//! which slots and values no longer conform to the current schema; the
//! instance store decides accept / repair / reject policy from the outcome.

pub mod engine;
pub mod outcome;
pub mod path;

pub use engine::{ParsedFrame, ParsedInstance, ParsedSlot, Regenerator};
pub use outcome::{RegenInstance, RegenInstanceBuilder, RegenStatus, RegenType};
pub use path::{PrunedKind, PrunedValue, RegenPath};
