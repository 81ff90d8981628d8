//! # Instance Networks
//!
//! Rendering an instance's property graph into a normalized node/link/numeric
//! network, plus the structural pre-processors that rewrite a built network
//! before downstream export or reasoning.
//!
//! A network is fresh per build: the builder deduplicates shared substructure
//! through an identity-keyed cache, processors rewrite in place during one
//! synchronous pass, and the whole arena is discarded once the consuming
//! operation completes.

pub mod builder;
pub mod bypass;
pub mod entity;
pub mod swap;
pub mod visit;

pub use builder::NetworkBuilder;
pub use bypass::{LinkBypasser, NodeBypasser};
pub use entity::{Link, Network, Node, NodeRef, Numeric, SlotRef};
pub use swap::{ConceptSwapper, EntityTypeSwapper};
pub use visit::{reachable_nodes, visit_nodes, visit_nodes_mut};

/// A rewrite pass over a built network.
///
/// Implementations must visit every reachable node at most once (the
/// [`visit`] walkers provide the cycle-safe traversal) and must not touch the
/// source instance graph.
pub trait NetworkProcessor {
    fn process(&self, network: &mut Network, root: NodeRef);
}
