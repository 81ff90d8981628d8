//! The customizer chain wrapping a base matcher.

use tracing::trace;

use crate::model::{ConceptId, InstanceGraph, InstanceId};

use super::{rank, InstanceMatcher};

/// A comparison strategy composed around a base matcher.
///
/// Customizers see every `add`/`remove` before delegation and may override
/// the comparison for the portion of an instance they target, leaving the
/// residual to the base matcher.
pub trait MatchCustomizer: Send + Sync {
    /// Rewrite an incoming instance before the base matcher stores it.
    ///
    /// Must be idempotent: the chain re-applies it to stored copies when
    /// `matches` is called against graphs that did not pass through `add`.
    fn on_add(&self, instance: &mut InstanceGraph) {
        let _ = instance;
    }

    /// Rewrite an incoming query. Defaults to the `on_add` rewrite.
    fn on_query(&self, query: &mut InstanceGraph) {
        self.on_add(query);
    }

    /// Compare the targeted portion of `query` against `stored`, strip that
    /// portion from both working copies, and return the verdict. `None` when
    /// this customizer does not apply to the pair (the query does not
    /// constrain the targeted portion).
    fn intercept(
        &self,
        base: &dyn InstanceMatcher,
        query: &mut InstanceGraph,
        stored: &mut InstanceGraph,
    ) -> Option<bool>;
}

/// Wraps a base matcher with an ordered, effectively-immutable customizer
/// chain. A match succeeds only when every participating customizer and the
/// base matcher's residual comparison agree.
///
/// The chain itself holds no other mutable state and performs no locking;
/// concurrent use against one store is serialized by the enclosing store.
pub struct CustomizedMatcher<M: InstanceMatcher> {
    base: M,
    customizers: Vec<Box<dyn MatchCustomizer>>,
}

impl<M: InstanceMatcher> CustomizedMatcher<M> {
    pub fn new(base: M) -> Self {
        Self {
            base,
            customizers: Vec::new(),
        }
    }

    /// Append a customizer. Chain order is registration order.
    pub fn register(&mut self, customizer: Box<dyn MatchCustomizer>) {
        self.customizers.push(customizer);
    }

    pub fn base(&self) -> &M {
        &self.base
    }
}

impl<M: InstanceMatcher> InstanceMatcher for CustomizedMatcher<M> {
    fn handles_type(&self, concept: &ConceptId) -> bool {
        self.base.handles_type(concept)
    }

    fn add(&mut self, id: InstanceId, mut instance: InstanceGraph) {
        for c in &self.customizers {
            c.on_add(&mut instance);
        }
        self.base.add(id, instance);
    }

    fn remove(&mut self, id: InstanceId) -> bool {
        self.base.remove(id)
    }

    fn ids(&self) -> Vec<InstanceId> {
        self.base.ids()
    }

    fn instance(&self, id: InstanceId) -> Option<&InstanceGraph> {
        self.base.instance(id)
    }

    fn query(&self, query: &InstanceGraph) -> Vec<InstanceId> {
        let hits = self
            .base
            .ids()
            .into_iter()
            .filter_map(|id| self.base.instance(id).map(|stored| (id, stored)))
            .filter(|(_, stored)| self.matches(query, stored))
            .map(|(id, stored)| (id, stored.root_tag() == query.root_tag()))
            .collect();
        rank(hits)
    }

    fn matches(&self, query: &InstanceGraph, stored: &InstanceGraph) -> bool {
        let mut q = query.clone();
        let mut s = stored.clone();
        for c in &self.customizers {
            c.on_query(&mut q);
            c.on_add(&mut s);
        }
        for c in &self.customizers {
            if let Some(verdict) = c.intercept(&self.base, &mut q, &mut s) {
                if !verdict {
                    trace!("customizer veto");
                    return false;
                }
            }
        }
        self.base.matches(&q, &s)
    }
}
