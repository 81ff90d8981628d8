//! Aggregation customizer for repeatable sub-structures.

use tracing::debug;

use crate::model::{InstanceGraph, NumberRange, PropertyId, Slot, SlotValues};

use super::{InstanceMatcher, MatchCustomizer};

/// How the per-sub-frame attribute values combine into one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMode {
    /// `[min, max]` across all values.
    Span,
    /// Pointwise sum of the per-sub-frame ranges.
    Sum,
}

/// Lets a one-to-many relation be queried with range semantics.
///
/// Targets a repeatable frame-valued `section` slot whose sub-frames each
/// carry a scalar numeric `attribute`. On store (and on query), the
/// attribute is cleared from every sub-frame copy and folded into a single
/// range-valued `aggregate` slot on the parent. At match time the two
/// aggregates compare by overlap; the remaining sub-structure flows through
/// the base matcher untouched.
#[derive(Debug, Clone)]
pub struct Aggregator {
    section: PropertyId,
    attribute: PropertyId,
    aggregate: PropertyId,
    mode: AggregateMode,
}

impl Aggregator {
    pub fn new(
        section: impl Into<PropertyId>,
        attribute: impl Into<PropertyId>,
        aggregate: impl Into<PropertyId>,
        mode: AggregateMode,
    ) -> Self {
        Self {
            section: section.into(),
            attribute: attribute.into(),
            aggregate: aggregate.into(),
            mode,
        }
    }

    fn fold(&self, ranges: Vec<NumberRange>) -> Option<NumberRange> {
        match self.mode {
            AggregateMode::Span => NumberRange::span(ranges),
            AggregateMode::Sum => NumberRange::sum(ranges),
        }
    }
}

impl MatchCustomizer for Aggregator {
    fn on_add(&self, instance: &mut InstanceGraph) {
        let root = instance.root();
        let Some(slot) = instance.frame(root).and_then(|f| f.slot(&self.section)) else {
            return;
        };
        let SlotValues::Frames(subs) = slot.values.clone() else {
            return;
        };

        let mut collected = Vec::new();
        for sub in subs {
            if let Some(Slot {
                values: SlotValues::Numbers(ranges),
                ..
            }) = instance.remove_slot(sub, &self.attribute)
            {
                collected.extend(ranges);
            }
        }
        // No attribute values left to fold: either the rewrite already ran
        // (idempotent re-application) or the section carries none.
        if collected.is_empty() {
            return;
        }
        if let Some(range) = self.fold(collected) {
            debug!(aggregate = %self.aggregate, %range, "aggregated section attribute");
            instance.set_slot(root, Slot::numbers(self.aggregate.clone(), [range]));
        }
    }

    fn intercept(
        &self,
        _base: &dyn InstanceMatcher,
        query: &mut InstanceGraph,
        stored: &mut InstanceGraph,
    ) -> Option<bool> {
        let q_slot = query.remove_slot(query.root(), &self.aggregate)?;
        let SlotValues::Numbers(q_ranges) = q_slot.values else {
            query.set_slot(query.root(), q_slot);
            return None;
        };

        let Some(Slot {
            values: SlotValues::Numbers(s_ranges),
            ..
        }) = stored.remove_slot(stored.root(), &self.aggregate)
        else {
            return Some(false);
        };

        Some(
            q_ranges
                .iter()
                .any(|q| s_ranges.iter().any(|s| q.overlaps(s))),
        )
    }
}
