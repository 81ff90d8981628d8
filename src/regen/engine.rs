//! The regeneration engine: rebuilding an instance from its parsed
//! serialization against the current schema.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{
    ConceptId, FrameCategory, FrameId, InstanceGraph, NumberRange, PropertyId, Slot, SlotValues,
    TypeTag,
};
use crate::schema::{Schema, SlotSpec, ValueKind};

use super::path::{PrunedValue, RegenPath};
use super::{RegenInstance, RegenInstanceBuilder, RegenType};

// ============================================================================
// Parsed serialization input
// ============================================================================

/// One slot as the upstream parser delivered it: raw values plus the textual
/// path identifying its location in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSlot {
    pub property: PropertyId,
    pub values: SlotValues,
    pub path: Vec<String>,
}

/// One frame from the parsed serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFrame {
    pub id: FrameId,
    pub tag: TypeTag,
    #[serde(default)]
    pub category: FrameCategory,
    pub slots: Vec<ParsedSlot>,
}

/// The parse result for one serialized instance. The byte-level encoding is
/// the parser's business; this is the structured handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInstance {
    pub root_type: ConceptId,
    pub root: FrameId,
    pub frames: Vec<ParsedFrame>,
}

// ============================================================================
// Regenerator
// ============================================================================

/// Rebuilds instances from parsed serializations, pruning whatever the
/// current schema no longer supports.
///
/// Schema drift is the expected, recoverable case here: a missing slot or a
/// now-invalid value is reported through pruned paths and a non-fatal
/// status, never as an error. The schema is injected explicitly; the engine
/// holds no other state.
pub struct Regenerator<'s, S: Schema> {
    schema: &'s S,
}

impl<'s, S: Schema> Regenerator<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self { schema }
    }

    /// Cheap currency check on a root type, for callers deciding whether a
    /// full regeneration is worth attempting.
    pub fn check_type(&self, root_type: &ConceptId) -> RegenType {
        match self.schema.concept(root_type) {
            Some(info) => RegenType::create_valid(root_type.clone(), info),
            None => RegenType::create_invalid(root_type.clone()),
        }
    }

    /// Reconstruct `parsed` against the current schema.
    pub fn regenerate(&self, parsed: &ParsedInstance) -> RegenInstance {
        let mut builder = RegenInstanceBuilder::new(parsed.root_type.clone());

        if self.schema.concept(&parsed.root_type).is_none() {
            debug!(root_type = %parsed.root_type, "root type no longer valid");
            return builder.create_invalid();
        }

        let frames: HashMap<FrameId, &ParsedFrame> =
            parsed.frames.iter().map(|f| (f.id, f)).collect();
        let Some(root) = frames.get(&parsed.root) else {
            // A serialization without its own root frame cannot be rebuilt.
            return builder.create_invalid();
        };

        let mut pass = RegenPass {
            schema: self.schema,
            frames: &frames,
            graph: InstanceGraph::new(root.tag.clone()),
            mapped: HashMap::new(),
            builder: &mut builder,
        };
        pass.mapped.insert(parsed.root, pass.graph.root());
        pass.rebuild_frame(parsed.root);

        let graph = pass.graph;
        builder.create_valid(graph)
    }
}

struct RegenPass<'a, S: Schema> {
    schema: &'a S,
    frames: &'a HashMap<FrameId, &'a ParsedFrame>,
    graph: InstanceGraph,
    /// Parsed frame id → rebuilt frame id. Doubles as the visited set for
    /// cyclic serializations.
    mapped: HashMap<FrameId, FrameId>,
    builder: &'a mut RegenInstanceBuilder,
}

impl<'a, S: Schema> RegenPass<'a, S> {
    /// A frame is materializable when it exists and every tag alternative
    /// still resolves.
    fn frame_concept_valid(&self, id: FrameId) -> bool {
        self.frames.get(&id).is_some_and(|f| {
            f.tag
                .alternatives()
                .iter()
                .all(|c| self.schema.concept(c).is_some())
        })
    }

    fn slot_spec(&self, frame: &ParsedFrame, property: &PropertyId) -> Option<&'a SlotSpec> {
        frame
            .tag
            .alternatives()
            .iter()
            .find_map(|c| self.schema.slot(c, property))
    }

    fn rebuild_frame(&mut self, parsed_id: FrameId) {
        let parsed = self.frames[&parsed_id];
        let target = self.mapped[&parsed_id];
        if let Some(f) = self.graph.frame_mut(target) {
            f.category = parsed.category;
        }

        for slot in &parsed.slots {
            self.rebuild_slot(target, parsed, slot);
        }
    }

    fn rebuild_slot(&mut self, target: FrameId, owner: &ParsedFrame, slot: &ParsedSlot) {
        let Some(spec) = self.slot_spec(owner, &slot.property) else {
            debug!(property = %slot.property, "pruning undeclared slot");
            self.builder.add_pruned_path(RegenPath::slot(
                slot.path.iter().cloned(),
                slot.property.clone(),
            ));
            return;
        };

        let declared = match &slot.values {
            SlotValues::Frames(_) => ValueKind::Frame,
            SlotValues::Types(_) => ValueKind::TypeRef,
            SlotValues::Numbers(_) => ValueKind::Number,
        };
        if declared != spec.kind {
            // The slot survives in the schema but its kind drifted: the
            // serialized values are unusable wholesale.
            self.builder.add_pruned_path(RegenPath::slot(
                slot.path.iter().cloned(),
                slot.property.clone(),
            ));
            return;
        }

        let spec = spec.clone();
        match &slot.values {
            SlotValues::Frames(refs) => self.rebuild_frame_values(target, slot, &spec, refs),
            SlotValues::Types(concepts) => {
                let kept: Vec<ConceptId> = concepts
                    .iter()
                    .filter(|c| {
                        let ok = self.schema.concept(c).is_some() && allowed(&spec, c, self.schema);
                        if !ok {
                            self.prune_value(slot, PrunedValue::TypeRef((*c).clone()));
                        }
                        ok
                    })
                    .cloned()
                    .collect();
                if !kept.is_empty() {
                    self.graph.set_slot(
                        target,
                        Slot {
                            property: slot.property.clone(),
                            values: SlotValues::Types(kept),
                        },
                    );
                }
            }
            SlotValues::Numbers(ranges) => {
                let kept: Vec<NumberRange> = ranges
                    .iter()
                    .filter(|r| {
                        let ok = spec.range.is_none_or(|bounds| bounds.contains(r));
                        if !ok {
                            self.prune_value(slot, PrunedValue::Number(**r));
                        }
                        ok
                    })
                    .copied()
                    .collect();
                if !kept.is_empty() {
                    self.graph.set_slot(
                        target,
                        Slot {
                            property: slot.property.clone(),
                            values: SlotValues::Numbers(kept),
                        },
                    );
                }
            }
        }
    }

    fn rebuild_frame_values(
        &mut self,
        target: FrameId,
        slot: &ParsedSlot,
        spec: &SlotSpec,
        refs: &[FrameId],
    ) {
        let mut kept = Vec::new();
        for &r in refs {
            let valid = self.frame_concept_valid(r)
                && self.frames[&r]
                    .tag
                    .alternatives()
                    .iter()
                    .any(|c| allowed(spec, c, self.schema));
            if !valid {
                let concept = self
                    .frames
                    .get(&r)
                    .and_then(|f| f.tag.alternatives().first().cloned())
                    .unwrap_or_else(|| ConceptId::new("<unresolved>"));
                self.prune_value(slot, PrunedValue::Frame(concept));
                continue;
            }
            kept.push(self.materialize(r));
        }
        if !kept.is_empty() {
            self.graph.set_slot(
                target,
                Slot {
                    property: slot.property.clone(),
                    values: SlotValues::Frames(kept),
                },
            );
        }
    }

    /// Map a parsed frame into the rebuilt graph, descending into its slots
    /// on first visit only.
    fn materialize(&mut self, parsed_id: FrameId) -> FrameId {
        if let Some(&mapped) = self.mapped.get(&parsed_id) {
            return mapped;
        }
        let tag = self.frames[&parsed_id].tag.clone();
        let new_id = self.graph.add_frame(tag);
        self.mapped.insert(parsed_id, new_id);
        self.rebuild_frame(parsed_id);
        new_id
    }

    fn prune_value(&mut self, slot: &ParsedSlot, value: PrunedValue) {
        let mut segments = slot.path.clone();
        segments.push(display_pruned(&value));
        debug!(property = %slot.property, path = %segments.join("/"), "pruning value");
        self.builder.add_pruned_path(RegenPath::value(
            segments,
            slot.property.clone(),
            value,
        ));
    }
}

fn allowed<S: Schema>(spec: &SlotSpec, concept: &ConceptId, schema: &S) -> bool {
    spec.value_types.is_empty()
        || spec
            .value_types
            .iter()
            .any(|allowed| schema.subsumes(allowed, concept))
}

fn display_pruned(value: &PrunedValue) -> String {
    match value {
        PrunedValue::Frame(c) | PrunedValue::TypeRef(c) => c.as_str().to_owned(),
        PrunedValue::Number(r) => r.to_string(),
    }
}
