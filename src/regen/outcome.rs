//! Regeneration outcomes: validity-tagged instances and types.

use serde::{Deserialize, Serialize};

use crate::model::{ConceptId, InstanceGraph};
use crate::schema::ConceptInfo;

use super::RegenPath;

/// Overall validity of a regenerated instance. Always derived from the
/// outcome's contents, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegenStatus {
    FullyValid,
    PartiallyValid,
    FullyInvalid,
}

/// The result of regenerating one serialized instance against the current
/// schema. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenInstance {
    root_type: ConceptId,
    /// Absent iff the root type is no longer valid.
    root: Option<InstanceGraph>,
    pruned: Vec<RegenPath>,
}

impl RegenInstance {
    pub fn root_type(&self) -> &ConceptId {
        &self.root_type
    }

    pub fn root(&self) -> Option<&InstanceGraph> {
        self.root.as_ref()
    }

    /// Consume the outcome, handing the reconstructed graph to the store.
    pub fn into_root(self) -> Option<InstanceGraph> {
        self.root
    }

    pub fn status(&self) -> RegenStatus {
        match (&self.root, self.pruned.is_empty()) {
            (None, _) => RegenStatus::FullyInvalid,
            (Some(_), true) => RegenStatus::FullyValid,
            (Some(_), false) => RegenStatus::PartiallyValid,
        }
    }

    pub fn all_pruned_paths(&self) -> &[RegenPath] {
        &self.pruned
    }

    /// Prunes where the slot itself is gone: callers typically drop these.
    pub fn pruned_slot_paths(&self) -> impl Iterator<Item = &RegenPath> {
        self.pruned.iter().filter(|p| p.is_slot_path())
    }

    /// Prunes of single values on surviving slots: callers may re-attach a
    /// default instead of dropping the slot.
    pub fn pruned_value_paths(&self) -> impl Iterator<Item = &RegenPath> {
        self.pruned.iter().filter(|p| p.is_value_path())
    }
}

/// Accumulates pruned paths, then finalizes exactly once.
///
/// Both terminal calls take `self` by value: finalizing twice or adding a
/// path after finalization does not compile.
#[derive(Debug)]
pub struct RegenInstanceBuilder {
    root_type: ConceptId,
    pruned: Vec<RegenPath>,
}

impl RegenInstanceBuilder {
    pub fn new(root_type: ConceptId) -> Self {
        Self {
            root_type,
            pruned: Vec::new(),
        }
    }

    pub fn add_pruned_path(&mut self, path: RegenPath) {
        self.pruned.push(path);
    }

    /// The root type still resolves; accumulated prunes describe interior
    /// drift.
    pub fn create_valid(self, root: InstanceGraph) -> RegenInstance {
        RegenInstance {
            root_type: self.root_type,
            root: Some(root),
            pruned: self.pruned,
        }
    }

    /// The root type itself no longer resolves; no instance can exist.
    pub fn create_invalid(self) -> RegenInstance {
        RegenInstance {
            root_type: self.root_type,
            root: None,
            pruned: self.pruned,
        }
    }
}

/// The two-outcome result of checking whether a referenced root type is
/// still current, for callers deciding whether to attempt full regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenType {
    root_type: ConceptId,
    current: Option<ConceptInfo>,
}

impl RegenType {
    pub fn create_valid(root_type: ConceptId, current: ConceptInfo) -> Self {
        Self {
            root_type,
            current: Some(current),
        }
    }

    pub fn create_invalid(root_type: ConceptId) -> Self {
        Self {
            root_type,
            current: None,
        }
    }

    pub fn root_type(&self) -> &ConceptId {
        &self.root_type
    }

    pub fn current(&self) -> Option<&ConceptInfo> {
        self.current.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }
}
