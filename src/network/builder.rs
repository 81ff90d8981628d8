//! Rendering an instance graph into a node/link/numeric network.

use hashbrown::HashMap;
use tracing::debug;

use crate::model::{FrameCategory, FrameId, InstanceGraph, Slot, SlotValues, TypeTag};
use crate::schema::Schema;
use crate::{Error, Result};

use super::{Link, Network, Node, NodeRef, Numeric, SlotRef};

/// Builds a [`Network`] from an instance graph.
///
/// Each distinct source frame maps to exactly one node via an identity-keyed
/// cache. The cache entry is created before the frame's slots are rendered,
/// so cyclic and shared substructure short-circuits to the already-allocated
/// node instead of recursing unboundedly. Cyclic sources are tolerated, not
/// rejected.
///
/// The source graph is read-only; all build state is local to one call.
pub struct NetworkBuilder<'s, S: Schema> {
    schema: &'s S,
}

impl<'s, S: Schema> NetworkBuilder<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self { schema }
    }

    /// Render `graph` from its root. Fails only on a dangling frame
    /// reference, which indicates a corrupt source graph.
    pub fn build(&self, graph: &InstanceGraph) -> Result<Network> {
        let mut pass = BuildPass {
            schema: self.schema,
            graph,
            network: Network::with_capacity(graph.len()),
            cache: HashMap::with_capacity(graph.len()),
        };
        let root = pass.render_frame(graph.root())?;
        let mut network = pass.network;
        network.set_root(root);
        debug!(nodes = network.len(), "network built");
        Ok(network)
    }
}

struct BuildPass<'a, S: Schema> {
    schema: &'a S,
    graph: &'a InstanceGraph,
    network: Network,
    cache: HashMap<FrameId, NodeRef>,
}

impl<'a, S: Schema> BuildPass<'a, S> {
    fn render_frame(&mut self, id: FrameId) -> Result<NodeRef> {
        if let Some(&cached) = self.cache.get(&id) {
            return Ok(cached);
        }
        let frame = self
            .graph
            .frame(id)
            .ok_or_else(|| Error::DanglingFrame(id))?;

        // Allocate and cache before descending into slots: a cycle back to
        // this frame resolves to the node we are still filling in.
        let node = self.network.alloc(Node {
            tag: frame.tag.clone(),
            links: Vec::new(),
            numerics: Vec::new(),
            source: Some(id),
        });
        self.cache.insert(id, node);

        for slot in &frame.slots {
            self.render_slot(node, id, slot)?;
        }

        // Extension frames carry schema-declared fixed values; render them
        // uniformly alongside the asserted slots.
        if frame.category == FrameCategory::Extension {
            if let Some(concept) = frame.tag.atom() {
                for slot in self.schema.fixed_slots(concept).to_vec() {
                    self.render_slot(node, id, &slot)?;
                }
            }
        }

        Ok(node)
    }

    fn render_slot(&mut self, node: NodeRef, owner: FrameId, slot: &Slot) -> Result<()> {
        let source = Some(SlotRef {
            frame: owner,
            property: slot.property.clone(),
        });
        match &slot.values {
            SlotValues::Frames(frames) => {
                let mut values = smallvec::SmallVec::new();
                for &f in frames {
                    values.push(self.render_frame(f)?);
                }
                self.network.node_mut(node).links.push(Link {
                    property: slot.property.clone(),
                    values,
                    source,
                });
            }
            SlotValues::Types(concepts) => {
                // Type-denoting values normalize to fresh nodes with no
                // source frame.
                let mut values = smallvec::SmallVec::new();
                for c in concepts {
                    values.push(
                        self.network
                            .alloc(Node::new(TypeTag::Atomic(c.clone()))),
                    );
                }
                self.network.node_mut(node).links.push(Link {
                    property: slot.property.clone(),
                    values,
                    source,
                });
            }
            SlotValues::Numbers(numbers) => {
                self.network.node_mut(node).numerics.push(Numeric {
                    property: slot.property.clone(),
                    values: numbers.iter().copied().collect(),
                    source,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConceptId, NumberRange};
    use crate::schema::MemorySchema;
    use pretty_assertions::assert_eq;

    fn schema() -> MemorySchema {
        let mut s = MemorySchema::new();
        s.add_concept("Person").add_concept("Job").add_concept("Citizen");
        s
    }

    #[test]
    fn test_shared_substructure_dedups() {
        let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
        let shared = g.add_frame(TypeTag::atomic("Job"));
        g.set_slot(g.root(), Slot::frames("currentJob", [shared]));
        g.set_slot(g.root(), Slot::frames("previousJob", [shared]));

        let s = schema();
        let net = NetworkBuilder::new(&s).build(&g).unwrap();
        let root = net.node(net.root());
        let a = root.link(&"currentJob".into()).unwrap().values[0];
        let b = root.link(&"previousJob".into()).unwrap().values[0];
        assert_eq!(a, b);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
        let spouse = g.add_frame(TypeTag::atomic("Person"));
        g.set_slot(g.root(), Slot::frames("spouse", [spouse]));
        g.set_slot(spouse, Slot::frames("spouse", [g.root()]));

        let s = schema();
        let net = NetworkBuilder::new(&s).build(&g).unwrap();
        assert_eq!(net.len(), 2);
        let root = net.root();
        let partner = net.node(root).link(&"spouse".into()).unwrap().values[0];
        let back = net.node(partner).link(&"spouse".into()).unwrap().values[0];
        assert_eq!(back, root);
    }

    #[test]
    fn test_type_values_become_fresh_nodes() {
        let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
        g.set_slot(g.root(), Slot::types("citizenship", ["Citizen"]));

        let s = schema();
        let net = NetworkBuilder::new(&s).build(&g).unwrap();
        let link = net.node(net.root()).link(&"citizenship".into()).unwrap();
        let value = net.node(link.values[0]);
        assert_eq!(value.tag.atom(), Some(&ConceptId::from("Citizen")));
        assert_eq!(value.source, None);
    }

    #[test]
    fn test_extension_frame_renders_fixed_values() {
        let mut s = schema();
        s.mark_extension("Job");
        s.add_fixed_slot("Job", Slot::numbers("hoursPerWeek", [NumberRange::point(40.0)]));

        let g = {
            let mut g = InstanceGraph::new(TypeTag::atomic("Job"));
            let root = g.root();
            g.frame_mut(root).unwrap().category = FrameCategory::Extension;
            g
        };

        let net = NetworkBuilder::new(&s).build(&g).unwrap();
        let numeric = net.node(net.root()).numeric(&"hoursPerWeek".into()).unwrap();
        assert_eq!(numeric.values.as_slice(), &[NumberRange::point(40.0)]);
    }
}
