//! # Instance Matching
//!
//! `InstanceMatcher` is THE contract between the store and any matching
//! engine. The crate ships one base implementation, the schema-driven
//! [`SubsumptionMatcher`], and a wrapper, [`CustomizedMatcher`], that runs an
//! ordered chain of [`MatchCustomizer`] strategies around any base matcher.

pub mod aggregator;
pub mod chain;
pub mod core;
pub mod inverter;
pub mod overlap;

pub use aggregator::{AggregateMode, Aggregator};
pub use chain::{CustomizedMatcher, MatchCustomizer};
pub use self::core::SubsumptionMatcher;
pub use inverter::SectionInverter;
pub use overlap::RangeOverlapper;

use crate::model::{ConceptId, InstanceGraph, InstanceId};

/// The universal matching contract.
///
/// `query` returns candidates ranked deterministically: instances whose root
/// tag equals the query's exactly come first, then strictly-subsumed ones,
/// ties broken by ascending id.
pub trait InstanceMatcher {
    /// Whether this matcher accepts instances of the given root concept.
    fn handles_type(&self, concept: &ConceptId) -> bool;

    /// Store an instance under `id`, replacing any previous instance there.
    fn add(&mut self, id: InstanceId, instance: InstanceGraph);

    /// Drop the instance stored under `id`. Returns whether it existed.
    fn remove(&mut self, id: InstanceId) -> bool;

    /// All stored instance ids, ascending.
    fn ids(&self) -> Vec<InstanceId>;

    /// The instance stored under `id`, if any.
    fn instance(&self, id: InstanceId) -> Option<&InstanceGraph>;

    /// Ranked ids of stored instances matched by `query`.
    fn query(&self, query: &InstanceGraph) -> Vec<InstanceId>;

    /// Whether `query` matches `stored` (query subsumes stored, modulo any
    /// registered customizations).
    fn matches(&self, query: &InstanceGraph, stored: &InstanceGraph) -> bool;
}

/// Shared ranking rule over `(id, exact-root-tag-match)` hits: exact matches
/// first, then by ascending id.
pub(crate) fn rank(mut hits: Vec<(InstanceId, bool)>) -> Vec<InstanceId> {
    hits.sort_by_key(|&(id, exact)| (!exact, id));
    hits.into_iter().map(|(id, _)| id).collect()
}
