//! Pruned-path records produced during regeneration.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{ConceptId, NumberRange, PropertyId};

/// The value dropped by a value-level prune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PrunedValue {
    Frame(ConceptId),
    TypeRef(ConceptId),
    Number(NumberRange),
}

/// What was pruned at a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PrunedKind {
    /// The slot itself is no longer declared (or its kind drifted).
    Slot { property: PropertyId },
    /// One value on a still-valid slot is no longer valid.
    Value {
        property: PropertyId,
        value: PrunedValue,
    },
}

/// A location in the reconstructed instance that no longer conforms to the
/// current schema.
///
/// Equality and hashing are defined over the path-segment sequence only, so
/// two prunes at the same location compare equal regardless of what was
/// dropped there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenPath {
    segments: SmallVec<[String; 4]>,
    kind: PrunedKind,
}

impl RegenPath {
    pub fn slot(
        segments: impl IntoIterator<Item = impl Into<String>>,
        property: PropertyId,
    ) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            kind: PrunedKind::Slot { property },
        }
    }

    pub fn value(
        segments: impl IntoIterator<Item = impl Into<String>>,
        property: PropertyId,
        value: PrunedValue,
    ) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            kind: PrunedKind::Value { property, value },
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn kind(&self) -> &PrunedKind {
        &self.kind
    }

    pub fn is_slot_path(&self) -> bool {
        matches!(self.kind, PrunedKind::Slot { .. })
    }

    pub fn is_value_path(&self) -> bool {
        matches!(self.kind, PrunedKind::Value { .. })
    }

    /// The property of the pruned slot or of the slot the pruned value
    /// belonged to.
    pub fn property(&self) -> &PropertyId {
        match &self.kind {
            PrunedKind::Slot { property } => property,
            PrunedKind::Value { property, .. } => property,
        }
    }
}

impl PartialEq for RegenPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for RegenPath {}

impl std::hash::Hash for RegenPath {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl std::fmt::Display for RegenPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
