//! Bypass processors: structural rewrites that remove one level of
//! indirection from a built network.
//!
//! Both rewrites run in place on the network and never touch the source
//! instance graph. The root node is never itself a bypass candidate: only
//! links and value nodes reached by traversal from the root participate.
//! Predicates are assumed total and side-effect-free.

use hashbrown::HashSet;
use tracing::trace;

use super::{visit_nodes_mut, Link, Network, NetworkProcessor, Node, NodeRef};

/// Detaches every link satisfying the predicate and splices the links of its
/// value nodes directly onto the parent, re-applying the predicate to the
/// spliced-in links. Grandchild relations become direct children.
pub struct LinkBypasser<P: Fn(&Link) -> bool> {
    predicate: P,
}

impl<P: Fn(&Link) -> bool> LinkBypasser<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    fn rewrite(
        &self,
        network: &Network,
        links: Vec<Link>,
        spliced: &mut HashSet<NodeRef>,
        out: &mut Vec<Link>,
    ) {
        for link in links {
            if (self.predicate)(&link) {
                trace!(property = %link.property, "bypassing link");
                for &value in &link.values {
                    // A cyclic splice chain revisiting a value node would
                    // re-import the same links forever; splice each node at
                    // most once per parent rewrite.
                    if spliced.insert(value) {
                        let grandchildren = network.node(value).links.clone();
                        self.rewrite(network, grandchildren, spliced, out);
                    }
                }
            } else {
                out.push(link);
            }
        }
    }
}

impl<P: Fn(&Link) -> bool> NetworkProcessor for LinkBypasser<P> {
    fn process(&self, network: &mut Network, root: NodeRef) {
        visit_nodes_mut(network, root, &mut |net, n| {
            let original = std::mem::take(&mut net.node_mut(n).links);
            let mut kept = Vec::with_capacity(original.len());
            let mut spliced = HashSet::new();
            self.rewrite(net, original, &mut spliced, &mut kept);
            net.node_mut(n).links = kept;
        });
    }
}

/// Removes every value node satisfying the predicate from its link and
/// splices in, as values of the same link, every node reachable via any link
/// on the bypassed node, re-applying the predicate to the spliced-in nodes.
pub struct NodeBypasser<P: Fn(&Node) -> bool> {
    predicate: P,
}

impl<P: Fn(&Node) -> bool> NodeBypasser<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    fn expand(
        &self,
        network: &Network,
        values: &[NodeRef],
        bypassed: &mut HashSet<NodeRef>,
        out: &mut Vec<NodeRef>,
    ) {
        for &value in values {
            if (self.predicate)(network.node(value)) {
                if bypassed.insert(value) {
                    trace!(node = %value, "bypassing node");
                    let reachable: Vec<NodeRef> = network
                        .node(value)
                        .links
                        .iter()
                        .flat_map(|l| l.values.iter().copied())
                        .collect();
                    self.expand(network, &reachable, bypassed, out);
                }
            } else {
                out.push(value);
            }
        }
    }
}

impl<P: Fn(&Node) -> bool> NetworkProcessor for NodeBypasser<P> {
    fn process(&self, network: &mut Network, root: NodeRef) {
        visit_nodes_mut(network, root, &mut |net, n| {
            let links = std::mem::take(&mut net.node_mut(n).links);
            let mut rewritten = Vec::with_capacity(links.len());
            for mut link in links {
                let mut values = Vec::with_capacity(link.values.len());
                let mut bypassed = HashSet::new();
                self.expand(net, &link.values, &mut bypassed, &mut values);
                link.values = values.into_iter().collect();
                rewritten.push(link);
            }
            net.node_mut(n).links = rewritten;
        });
    }
}
