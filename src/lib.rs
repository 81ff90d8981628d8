//! # framestore — Frame-Based Knowledge-Instance Store
//!
//! Typed instances built from a concept/property schema, queried by partial
//! (possibly disjunctive) patterns, matched via pluggable subsumption, and
//! reloaded from persisted serializations while tolerating schema drift.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Schema` and `InstanceMatcher` are the contracts
//!    between the store and its collaborators
//! 2. **Clean DTOs**: `Frame`, `Slot`, `NumberRange`, `InstanceGraph` cross
//!    all boundaries
//! 3. **Networks are throwaway**: a build-process-consume pass owns its
//!    arena; the source graph is never touched
//! 4. **Drift is data, not failure**: regeneration reports pruned paths and
//!    a derived status instead of raising errors
//!
//! ## Quick Start
//!
//! ```rust
//! use framestore::{FrameStore, InstanceGraph, MemorySchema, NumberRange, Slot, TypeTag};
//!
//! # fn example() -> framestore::Result<()> {
//! let mut schema = MemorySchema::new();
//! schema.add_concept("Person").add_concept("Job");
//!
//! let store = FrameStore::new(schema);
//!
//! let mut person = InstanceGraph::new(TypeTag::atomic("Person"));
//! person.set_slot(person.root(), Slot::numbers("age", [NumberRange::point(34.0)]));
//! let id = store.add_instance(person)?;
//!
//! let mut query = InstanceGraph::new(TypeTag::atomic("Person"));
//! query.set_slot(query.root(), Slot::numbers("age", [NumberRange::new(30.0, 40.0)]));
//! assert_eq!(store.query(&query), vec![id]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod matcher;
pub mod model;
pub mod network;
pub mod regen;
pub mod schema;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    ConceptId, Frame, FrameCategory, FrameId, InstanceGraph, InstanceId, NumberRange, PropertyId,
    Slot, SlotValues, TypeTag,
};

// ============================================================================
// Re-exports: Schema
// ============================================================================

pub use schema::{ConceptInfo, MemorySchema, Schema, SlotSpec, ValueKind};

// ============================================================================
// Re-exports: Network
// ============================================================================

pub use network::{
    ConceptSwapper, EntityTypeSwapper, Link, LinkBypasser, Network, NetworkBuilder,
    NetworkProcessor, Node, NodeBypasser, NodeRef, Numeric,
};

// ============================================================================
// Re-exports: Matching
// ============================================================================

pub use matcher::{
    AggregateMode, Aggregator, CustomizedMatcher, InstanceMatcher, MatchCustomizer,
    RangeOverlapper, SectionInverter, SubsumptionMatcher,
};

// ============================================================================
// Re-exports: Regeneration
// ============================================================================

pub use regen::{
    ParsedFrame, ParsedInstance, ParsedSlot, RegenInstance, RegenInstanceBuilder, RegenPath,
    RegenStatus, RegenType, Regenerator,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

// ============================================================================
// Load policy
// ============================================================================

/// What the store does with a regenerated instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Accept only fully valid regenerations.
    Strict,
    /// Accept partial regenerations too, dropping the pruned parts.
    Repair,
}

/// Result of loading a serialized instance.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        id: InstanceId,
        regen: RegenInstance,
    },
    Rejected {
        regen: RegenInstance,
    },
}

impl LoadOutcome {
    pub fn id(&self) -> Option<InstanceId> {
        match self {
            LoadOutcome::Loaded { id, .. } => Some(*id),
            LoadOutcome::Rejected { .. } => None,
        }
    }

    pub fn regen(&self) -> &RegenInstance {
        match self {
            LoadOutcome::Loaded { regen, .. } => regen,
            LoadOutcome::Rejected { regen } => regen,
        }
    }
}

// ============================================================================
// Top-level FrameStore handle
// ============================================================================

/// The primary entry point. A `FrameStore` owns a schema and a customized
/// subsumption matcher and serializes all access to the stored instance set.
pub struct FrameStore<S: Schema> {
    schema: Arc<S>,
    matcher: RwLock<CustomizedMatcher<SubsumptionMatcher<S>>>,
    next_id: AtomicU64,
}

impl<S: Schema> FrameStore<S> {
    pub fn new(schema: S) -> Self {
        Self::with_schema(Arc::new(schema))
    }

    pub fn with_schema(schema: Arc<S>) -> Self {
        let matcher = CustomizedMatcher::new(SubsumptionMatcher::new(Arc::clone(&schema)));
        Self {
            schema,
            matcher: RwLock::new(matcher),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Append a match customizer. Register the full chain before storing
    /// instances: customizer rewrites apply at add time.
    pub fn register_customizer(&self, customizer: Box<dyn MatchCustomizer>) {
        self.matcher.write().register(customizer);
    }

    /// Store an instance, returning its id. Every root-tag alternative must
    /// resolve against the schema.
    pub fn add_instance(&self, instance: InstanceGraph) -> Result<InstanceId> {
        let mut matcher = self.matcher.write();
        for concept in instance.root_tag().alternatives() {
            if !matcher.handles_type(concept) {
                return Err(Error::UnknownConcept(concept.clone()));
            }
        }
        let id = InstanceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        matcher.add(id, instance);
        debug!(%id, "instance stored");
        Ok(id)
    }

    pub fn remove_instance(&self, id: InstanceId) -> bool {
        self.matcher.write().remove(id)
    }

    /// The stored (customizer-rewritten) copy of an instance.
    pub fn get_instance(&self, id: InstanceId) -> Option<InstanceGraph> {
        self.matcher.read().instance(id).cloned()
    }

    /// Ranked ids of stored instances matched by `query`.
    pub fn query(&self, query: &InstanceGraph) -> Vec<InstanceId> {
        self.matcher.read().query(query)
    }

    /// Whether `query` matches the instance stored under `id`.
    pub fn matches(&self, id: InstanceId, query: &InstanceGraph) -> Result<bool> {
        let matcher = self.matcher.read();
        let stored = matcher.instance(id).ok_or(Error::NoSuchInstance(id))?;
        Ok(matcher.matches(query, stored))
    }

    /// Render the stored instance into a node/link/numeric network for
    /// downstream export or reasoning.
    pub fn build_network(&self, id: InstanceId) -> Result<Network> {
        let instance = self
            .get_instance(id)
            .ok_or(Error::NoSuchInstance(id))?;
        NetworkBuilder::new(self.schema.as_ref()).build(&instance)
    }

    /// Regenerate a parsed serialization and apply the load policy.
    pub fn load(&self, parsed: &ParsedInstance, policy: LoadPolicy) -> Result<LoadOutcome> {
        let regen = Regenerator::new(self.schema.as_ref()).regenerate(parsed);
        let accept = match (policy, regen.status()) {
            (_, RegenStatus::FullyInvalid) => false,
            (LoadPolicy::Strict, RegenStatus::PartiallyValid) => false,
            (LoadPolicy::Strict, RegenStatus::FullyValid) => true,
            (LoadPolicy::Repair, _) => true,
        };
        if !accept {
            debug!(root_type = %regen.root_type(), status = ?regen.status(), "load rejected");
            return Ok(LoadOutcome::Rejected { regen });
        }
        // Status checks above guarantee a root graph is present.
        let graph = regen
            .root()
            .cloned()
            .ok_or_else(|| Error::Internal("accepted regeneration without root".into()))?;
        let id = self.add_instance(graph)?;
        Ok(LoadOutcome::Loaded { id, regen })
    }

    /// Convenience: parse a JSON-encoded [`ParsedInstance`] and load it.
    pub fn load_json(&self, json: &str, policy: LoadPolicy) -> Result<LoadOutcome> {
        let parsed: ParsedInstance = serde_json::from_str(json)?;
        self.load(&parsed, policy)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown concept: {0}")]
    UnknownConcept(ConceptId),

    #[error("no instance stored under id {0}")]
    NoSuchInstance(InstanceId),

    #[error("dangling frame reference: {0}")]
    DanglingFrame(FrameId),

    #[error("malformed serialized instance: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("internal invariant broken: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
