//! The base subsumption matcher.

use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::HashSet;
use tracing::trace;

use crate::model::{Frame, FrameId, InstanceGraph, InstanceId, SlotValues};
use crate::schema::Schema;

use super::{rank, InstanceMatcher};

/// Per-`matches` call state: pairs currently on the comparison stack and
/// pairs already known not to match.
#[derive(Default)]
struct MatchGuard {
    in_progress: HashSet<(FrameId, FrameId)>,
    failed: HashSet<(FrameId, FrameId)>,
}

/// Schema-driven base matcher: a query matches a stored instance when the
/// query subsumes it — the query's type at every position is more general
/// than or equal to the stored type, every query slot is satisfied by the
/// stored frame, and query numeric ranges cover the stored values. Stored
/// slots the query does not mention are unconstrained.
///
/// The matcher itself knows nothing about any particular schema: it is
/// driven entirely by the injected [`Schema::subsumes`] relation.
pub struct SubsumptionMatcher<S: Schema> {
    schema: Arc<S>,
    instances: BTreeMap<InstanceId, InstanceGraph>,
}

impl<S: Schema> SubsumptionMatcher<S> {
    pub fn new(schema: Arc<S>) -> Self {
        Self {
            schema,
            instances: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    fn tags_match(&self, query: &Frame, stored: &Frame) -> bool {
        // Disjunctions succeed on any alternative pairing.
        query.tag.alternatives().iter().any(|q| {
            stored
                .tag
                .alternatives()
                .iter()
                .any(|s| self.schema.subsumes(q, s))
        })
    }

    fn frames_match(
        &self,
        query: &InstanceGraph,
        qf: FrameId,
        stored: &InstanceGraph,
        sf: FrameId,
        guard: &mut MatchGuard,
    ) -> bool {
        let pair = (qf, sf);
        if guard.failed.contains(&pair) {
            return false;
        }
        // Revisiting an in-progress pair means we followed a reference
        // cycle; treat the pending comparison as satisfied.
        if !guard.in_progress.insert(pair) {
            return true;
        }
        let ok = self.frames_match_inner(query, qf, stored, sf, guard);
        guard.in_progress.remove(&pair);
        if !ok {
            guard.failed.insert(pair);
        }
        ok
    }

    fn frames_match_inner(
        &self,
        query: &InstanceGraph,
        qf: FrameId,
        stored: &InstanceGraph,
        sf: FrameId,
        guard: &mut MatchGuard,
    ) -> bool {
        let (Some(qframe), Some(sframe)) = (query.frame(qf), stored.frame(sf)) else {
            return false;
        };
        if !self.tags_match(qframe, sframe) {
            return false;
        }
        qframe.slots.iter().all(|qslot| {
            let Some(sslot) = sframe.slot(&qslot.property) else {
                return false;
            };
            match (&qslot.values, &sslot.values) {
                (SlotValues::Frames(qv), SlotValues::Frames(sv)) => qv.iter().all(|&q| {
                    sv.iter()
                        .any(|&s| self.frames_match(query, q, stored, s, guard))
                }),
                (SlotValues::Types(qv), SlotValues::Types(sv)) => qv
                    .iter()
                    .all(|q| sv.iter().any(|s| self.schema.subsumes(q, s))),
                (SlotValues::Numbers(qv), SlotValues::Numbers(sv)) => {
                    // Query-more-general: every stored value must sit inside
                    // some query range.
                    sv.iter().all(|s| qv.iter().any(|q| q.contains(s)))
                }
                _ => false,
            }
        })
    }
}

impl<S: Schema> InstanceMatcher for SubsumptionMatcher<S> {
    fn handles_type(&self, concept: &crate::model::ConceptId) -> bool {
        self.schema.concept(concept).is_some()
    }

    fn add(&mut self, id: InstanceId, instance: InstanceGraph) {
        trace!(%id, frames = instance.len(), "matcher add");
        self.instances.insert(id, instance);
    }

    fn remove(&mut self, id: InstanceId) -> bool {
        self.instances.remove(&id).is_some()
    }

    fn ids(&self) -> Vec<InstanceId> {
        self.instances.keys().copied().collect()
    }

    fn instance(&self, id: InstanceId) -> Option<&InstanceGraph> {
        self.instances.get(&id)
    }

    fn query(&self, query: &InstanceGraph) -> Vec<InstanceId> {
        let hits = self
            .instances
            .iter()
            .filter(|(_, stored)| self.matches(query, stored))
            .map(|(&id, stored)| (id, stored.root_tag() == query.root_tag()))
            .collect();
        rank(hits)
    }

    fn matches(&self, query: &InstanceGraph, stored: &InstanceGraph) -> bool {
        let mut guard = MatchGuard::default();
        self.frames_match(query, query.root(), stored, stored.root(), &mut guard)
    }
}
