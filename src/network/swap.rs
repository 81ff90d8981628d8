//! Type-swapping processors.

use tracing::trace;

use crate::model::{ConceptId, TypeTag};

use super::{visit_nodes_mut, Network, NetworkProcessor, NodeRef};

/// Replaces the concept of every atomic-tagged node matching `from` with
/// `to`. Disjunctive nodes are left untouched; the swap is defined only for
/// atomic type positions.
#[derive(Debug, Clone)]
pub struct ConceptSwapper {
    pub from: ConceptId,
    pub to: ConceptId,
}

impl ConceptSwapper {
    pub fn new(from: impl Into<ConceptId>, to: impl Into<ConceptId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl NetworkProcessor for ConceptSwapper {
    fn process(&self, network: &mut Network, root: NodeRef) {
        visit_nodes_mut(network, root, &mut |net, n| {
            let node = net.node_mut(n);
            if node.tag.atom() == Some(&self.from) {
                trace!(node = %n, from = %self.from, to = %self.to, "concept swap");
                node.tag = TypeTag::Atomic(self.to.clone());
            }
        });
    }
}

/// Generalization of [`ConceptSwapper`]: applies the replace-if-matches rule
/// uniformly to every type-tag-carrying entity — node concepts, link
/// properties, and numeric properties.
#[derive(Debug, Clone)]
pub struct EntityTypeSwapper {
    pub from: ConceptId,
    pub to: ConceptId,
}

impl EntityTypeSwapper {
    pub fn new(from: impl Into<ConceptId>, to: impl Into<ConceptId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl NetworkProcessor for EntityTypeSwapper {
    fn process(&self, network: &mut Network, root: NodeRef) {
        visit_nodes_mut(network, root, &mut |net, n| {
            let node = net.node_mut(n);
            if node.tag.atom() == Some(&self.from) {
                node.tag = TypeTag::Atomic(self.to.clone());
            }
            for link in &mut node.links {
                if link.property.as_str() == self.from.as_str() {
                    link.property = crate::model::PropertyId::new(self.to.as_str());
                }
            }
            for numeric in &mut node.numerics {
                if numeric.property.as_str() == self.from.as_str() {
                    numeric.property = crate::model::PropertyId::new(self.to.as_str());
                }
            }
        });
    }
}
