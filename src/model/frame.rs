//! Frames: the instance elements of the knowledge store.

use serde::{Deserialize, Serialize};

use super::{ConceptId, FrameId, NumberRange, PropertyId};

/// The type position of a frame or network node: one concept, or a
/// disjunction of simultaneously-possible concepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "concepts")]
pub enum TypeTag {
    Atomic(ConceptId),
    /// Two or more alternatives, order-preserving.
    Disjunction(Vec<ConceptId>),
}

impl TypeTag {
    pub fn atomic(concept: impl Into<ConceptId>) -> Self {
        TypeTag::Atomic(concept.into())
    }

    pub fn disjunction(concepts: impl IntoIterator<Item = impl Into<ConceptId>>) -> Self {
        TypeTag::Disjunction(concepts.into_iter().map(Into::into).collect())
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, TypeTag::Atomic(_))
    }

    /// The single concept of an atomic tag, `None` for disjunctions.
    pub fn atom(&self) -> Option<&ConceptId> {
        match self {
            TypeTag::Atomic(c) => Some(c),
            TypeTag::Disjunction(_) => None,
        }
    }

    /// All alternatives: one for atomic tags, each listed concept otherwise.
    pub fn alternatives(&self) -> &[ConceptId] {
        match self {
            TypeTag::Atomic(c) => std::slice::from_ref(c),
            TypeTag::Disjunction(cs) => cs,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Atomic(c) => write!(f, "{c}"),
            TypeTag::Disjunction(cs) => {
                for (i, c) in cs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{c}")?;
                }
                Ok(())
            }
        }
    }
}

/// What kind of frame this element is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameCategory {
    /// An ordinary instance-asserted frame.
    #[default]
    Assertion,
    /// A pure type-definition frame: its fixed slot values come from the
    /// schema rather than from the instance.
    Extension,
}

/// The values attached to one slot, dispatched by declared value kind.
///
/// A closed union: every consumer matches exhaustively, so adding a kind is a
/// compile-time sweep rather than a visitor hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values")]
pub enum SlotValues {
    /// Object-valued: references into the owning [`InstanceGraph`](super::InstanceGraph).
    Frames(Vec<FrameId>),
    /// Concept/type-denoting values.
    Types(Vec<ConceptId>),
    /// Numeric values or ranges.
    Numbers(Vec<NumberRange>),
}

impl SlotValues {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SlotValues::Frames(_) => "FRAME",
            SlotValues::Types(_) => "TYPE",
            SlotValues::Numbers(_) => "NUMBER",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SlotValues::Frames(v) => v.is_empty(),
            SlotValues::Types(v) => v.is_empty(),
            SlotValues::Numbers(v) => v.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SlotValues::Frames(v) => v.len(),
            SlotValues::Types(v) => v.len(),
            SlotValues::Numbers(v) => v.len(),
        }
    }
}

/// A named, typed relation attached to a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub property: PropertyId,
    pub values: SlotValues,
}

impl Slot {
    pub fn frames(property: impl Into<PropertyId>, values: impl IntoIterator<Item = FrameId>) -> Self {
        Self {
            property: property.into(),
            values: SlotValues::Frames(values.into_iter().collect()),
        }
    }

    pub fn types(
        property: impl Into<PropertyId>,
        values: impl IntoIterator<Item = impl Into<ConceptId>>,
    ) -> Self {
        Self {
            property: property.into(),
            values: SlotValues::Types(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn numbers(
        property: impl Into<PropertyId>,
        values: impl IntoIterator<Item = impl Into<NumberRange>>,
    ) -> Self {
        Self {
            property: property.into(),
            values: SlotValues::Numbers(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// An instance element: a typed frame carrying ordered property slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub tag: TypeTag,
    pub category: FrameCategory,
    pub slots: Vec<Slot>,
}

impl Frame {
    pub fn new(id: FrameId, tag: TypeTag) -> Self {
        Self {
            id,
            tag,
            category: FrameCategory::Assertion,
            slots: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: FrameCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn slot(&self, property: &PropertyId) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.property == property)
    }

    pub fn slot_mut(&mut self, property: &PropertyId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| &s.property == property)
    }

    /// Replace the slot for `slot.property` if present, append otherwise.
    pub fn set_slot(&mut self, slot: Slot) {
        match self.slot_mut(&slot.property) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    /// Remove and return the slot for `property`.
    pub fn remove_slot(&mut self, property: &PropertyId) -> Option<Slot> {
        let idx = self.slots.iter().position(|s| &s.property == property)?;
        Some(self.slots.remove(idx))
    }
}
