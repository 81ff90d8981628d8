//! # Schema Service Contract
//!
//! The schema/type model is a read-only collaborator: the store consumes
//! concept identities, slot declarations, fixed values, and the subsumption
//! relation through the [`Schema`] trait and never writes back.
//!
//! `MemorySchema` is the reference implementation, used by tests and by
//! embedders that do not bring their own type service.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{ConceptId, FrameCategory, NumberRange, PropertyId, Slot};

// ============================================================================
// Declarations
// ============================================================================

/// Declared value kind of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Object-valued: instance frames.
    Frame,
    /// Concept/type-denoting values.
    TypeRef,
    /// Numeric values or ranges.
    Number,
}

/// A slot declaration on a concept, with the constraints regeneration
/// validates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub property: PropertyId,
    pub kind: ValueKind,
    /// Allowed value concepts for `Frame`/`TypeRef` slots. Empty = any.
    pub value_types: Vec<ConceptId>,
    /// Declared numeric bounds for `Number` slots. `None` = unbounded.
    pub range: Option<NumberRange>,
}

impl SlotSpec {
    pub fn frame(property: impl Into<PropertyId>, value_types: Vec<ConceptId>) -> Self {
        Self {
            property: property.into(),
            kind: ValueKind::Frame,
            value_types,
            range: None,
        }
    }

    pub fn type_ref(property: impl Into<PropertyId>, value_types: Vec<ConceptId>) -> Self {
        Self {
            property: property.into(),
            kind: ValueKind::TypeRef,
            value_types,
            range: None,
        }
    }

    pub fn number(property: impl Into<PropertyId>, range: Option<NumberRange>) -> Self {
        Self {
            property: property.into(),
            kind: ValueKind::Number,
            value_types: Vec::new(),
            range,
        }
    }
}

/// Resolved concept metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptInfo {
    pub id: ConceptId,
    pub category: FrameCategory,
}

// ============================================================================
// Schema trait
// ============================================================================

/// The universal schema contract.
///
/// Implementations must keep `subsumes` reflexive and transitive.
pub trait Schema {
    /// Resolve a concept, `None` if it no longer exists in the current schema.
    fn concept(&self, id: &ConceptId) -> Option<ConceptInfo>;

    /// The declared slot `property` on `concept`, `None` if undeclared.
    fn slot(&self, concept: &ConceptId, property: &PropertyId) -> Option<&SlotSpec>;

    /// Schema-declared fixed slot values for type-definition (Extension) frames.
    fn fixed_slots(&self, concept: &ConceptId) -> &[Slot];

    /// `general` is more general than or equal to `specific`.
    fn subsumes(&self, general: &ConceptId, specific: &ConceptId) -> bool;
}

// ============================================================================
// MemorySchema
// ============================================================================

#[derive(Debug, Default)]
struct ConceptEntry {
    parent: Option<ConceptId>,
    category: FrameCategory,
    slots: Vec<SlotSpec>,
    fixed: Vec<Slot>,
}

/// In-memory parent-pointer hierarchy with per-concept slot tables.
///
/// Subsumption is the reflexive-transitive ancestor walk. Slot declarations
/// are inherited: a lookup on a concept falls back to its ancestors.
#[derive(Debug, Default)]
pub struct MemorySchema {
    concepts: HashMap<ConceptId, ConceptEntry>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root concept.
    pub fn add_concept(&mut self, id: impl Into<ConceptId>) -> &mut Self {
        self.concepts.entry(id.into()).or_default();
        self
    }

    /// Register a concept below `parent`. The parent need not exist yet.
    pub fn add_subconcept(
        &mut self,
        id: impl Into<ConceptId>,
        parent: impl Into<ConceptId>,
    ) -> &mut Self {
        let entry = self.concepts.entry(id.into()).or_default();
        entry.parent = Some(parent.into());
        self
    }

    /// Mark a concept as a type-definition (Extension) frame category.
    pub fn mark_extension(&mut self, id: impl Into<ConceptId>) -> &mut Self {
        self.concepts.entry(id.into()).or_default().category = FrameCategory::Extension;
        self
    }

    /// Declare a slot on a concept.
    pub fn add_slot(&mut self, concept: impl Into<ConceptId>, spec: SlotSpec) -> &mut Self {
        self.concepts.entry(concept.into()).or_default().slots.push(spec);
        self
    }

    /// Declare a fixed slot value on a type-definition concept.
    pub fn add_fixed_slot(&mut self, concept: impl Into<ConceptId>, slot: Slot) -> &mut Self {
        self.concepts.entry(concept.into()).or_default().fixed.push(slot);
        self
    }

    /// Drop a concept entirely. Used by drift tests to simulate schema
    /// evolution between store and reload.
    pub fn remove_concept(&mut self, id: &ConceptId) -> bool {
        self.concepts.remove(id).is_some()
    }

    /// Drop one slot declaration from a concept.
    pub fn remove_slot(&mut self, concept: &ConceptId, property: &PropertyId) -> bool {
        let Some(entry) = self.concepts.get_mut(concept) else {
            return false;
        };
        let before = entry.slots.len();
        entry.slots.retain(|s| &s.property != property);
        entry.slots.len() != before
    }

    fn ancestors<'a>(&'a self, id: &'a ConceptId) -> impl Iterator<Item = &'a ConceptId> {
        std::iter::successors(Some(id), |cur| {
            self.concepts.get(*cur).and_then(|e| e.parent.as_ref())
        })
    }
}

impl Schema for MemorySchema {
    fn concept(&self, id: &ConceptId) -> Option<ConceptInfo> {
        self.concepts.get(id).map(|e| ConceptInfo {
            id: id.clone(),
            category: e.category,
        })
    }

    fn slot(&self, concept: &ConceptId, property: &PropertyId) -> Option<&SlotSpec> {
        if !self.concepts.contains_key(concept) {
            return None;
        }
        self.ancestors(concept).find_map(|c| {
            self.concepts
                .get(c)
                .and_then(|e| e.slots.iter().find(|s| &s.property == property))
        })
    }

    fn fixed_slots(&self, concept: &ConceptId) -> &[Slot] {
        self.concepts.get(concept).map(|e| e.fixed.as_slice()).unwrap_or(&[])
    }

    fn subsumes(&self, general: &ConceptId, specific: &ConceptId) -> bool {
        if !self.concepts.contains_key(specific) {
            return false;
        }
        self.ancestors(specific).any(|c| c == general)
    }
}
