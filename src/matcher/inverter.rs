//! Subsumption-direction inversion for one designated section.

use crate::model::{InstanceGraph, PropertyId, SlotValues};

use super::{InstanceMatcher, MatchCustomizer};

/// Reverses the subsumption direction for one frame-valued section.
///
/// By default the query's value at a position must subsume the stored value.
/// For the designated section only, the stored instance's value must subsume
/// the query's value — certain relations are naturally queried
/// narrow-to-broad. Implemented by delegating the section comparison back to
/// the base matcher with the roles swapped, so no second matcher
/// implementation exists. All other sections keep the default direction.
#[derive(Debug, Clone)]
pub struct SectionInverter {
    section: PropertyId,
}

impl SectionInverter {
    pub fn new(section: impl Into<PropertyId>) -> Self {
        Self {
            section: section.into(),
        }
    }
}

impl MatchCustomizer for SectionInverter {
    fn intercept(
        &self,
        base: &dyn InstanceMatcher,
        query: &mut InstanceGraph,
        stored: &mut InstanceGraph,
    ) -> Option<bool> {
        let q_slot = query.remove_slot(query.root(), &self.section)?;
        let SlotValues::Frames(q_subs) = q_slot.values else {
            query.set_slot(query.root(), q_slot);
            return None;
        };

        let Some(s_slot) = stored.remove_slot(stored.root(), &self.section) else {
            return Some(false);
        };
        let SlotValues::Frames(s_subs) = s_slot.values else {
            return Some(false);
        };

        // Inverted direction: each query sub-frame must be subsumed by some
        // stored sub-frame, so the stored side plays the query role.
        let verdict = q_subs.iter().all(|&q_sub| {
            let Some(q_graph) = query.subgraph(q_sub) else {
                return false;
            };
            s_subs.iter().any(|&s_sub| {
                stored
                    .subgraph(s_sub)
                    .is_some_and(|s_graph| base.matches(&s_graph, &q_graph))
            })
        });
        Some(verdict)
    }
}
