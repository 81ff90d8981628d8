//! Cycle-safe depth-first traversal over a built network.

use hashbrown::HashSet;

use super::{Network, NodeRef};

/// Visit every node reachable from `root` exactly once, depth-first: a node,
/// then each link's value nodes in order, then the next link. Numerics hang
/// off the node itself and need no separate visit order.
///
/// The visited set makes traversal terminate on networks whose underlying
/// source graph was cyclic.
pub fn visit_nodes(network: &Network, root: NodeRef, f: &mut impl FnMut(&Network, NodeRef)) {
    let mut visited = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        f(network, node);
        push_children(network, node, &mut stack);
    }
}

/// Mutable variant driving the processors. Children are snapshotted after
/// `f` runs on a node, so structural rewrites (bypass splices) are traversed
/// rather than skipped.
pub fn visit_nodes_mut(
    network: &mut Network,
    root: NodeRef,
    f: &mut impl FnMut(&mut Network, NodeRef),
) {
    let mut visited = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        f(network, node);
        push_children(network, node, &mut stack);
    }
}

fn push_children(network: &Network, node: NodeRef, stack: &mut Vec<NodeRef>) {
    // Reverse push keeps pop order equal to declaration order.
    for link in network.node(node).links.iter().rev() {
        for &value in link.values.iter().rev() {
            stack.push(value);
        }
    }
}

/// Collect every node reachable from `root`, in visit order.
pub fn reachable_nodes(network: &Network, root: NodeRef) -> Vec<NodeRef> {
    let mut out = Vec::new();
    visit_nodes(network, root, &mut |_, n| out.push(n));
    out
}
