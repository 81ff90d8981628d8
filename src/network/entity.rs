//! Network entities: nodes, links, numerics, and the owning arena.

use smallvec::SmallVec;

use crate::model::{FrameId, NumberRange, PropertyId, TypeTag};

/// Index of a node in its [`Network`] arena.
///
/// The dedup invariant is expressed in these indices: two links referencing
/// the same source frame carry the same `NodeRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u32);

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Back-reference from a network entity to the slot it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRef {
    pub frame: FrameId,
    pub property: PropertyId,
}

/// An object-valued relation on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub property: PropertyId,
    pub values: SmallVec<[NodeRef; 4]>,
    pub source: Option<SlotRef>,
}

impl Link {
    pub fn new(property: PropertyId, values: impl IntoIterator<Item = NodeRef>) -> Self {
        Self {
            property,
            values: values.into_iter().collect(),
            source: None,
        }
    }
}

/// A numeric-valued relation on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    pub property: PropertyId,
    pub values: SmallVec<[NumberRange; 2]>,
    pub source: Option<SlotRef>,
}

impl Numeric {
    pub fn new(property: PropertyId, values: impl IntoIterator<Item = NumberRange>) -> Self {
        Self {
            property,
            values: values.into_iter().collect(),
            source: None,
        }
    }
}

/// A concept identity (atomic or disjunctive) with its ordered link and
/// numeric attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: TypeTag,
    pub links: Vec<Link>,
    pub numerics: Vec<Numeric>,
    /// The originating instance element, for re-attachment of edits.
    /// Absent for nodes rendered from type-reference values.
    pub source: Option<FrameId>,
}

impl Node {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            links: Vec::new(),
            numerics: Vec::new(),
            source: None,
        }
    }

    pub fn link(&self, property: &PropertyId) -> Option<&Link> {
        self.links.iter().find(|l| &l.property == property)
    }

    pub fn numeric(&self, property: &PropertyId) -> Option<&Numeric> {
        self.numerics.iter().find(|n| &n.property == property)
    }
}

/// A built network: node arena plus root. Fresh per build invocation,
/// mutated only by processors, discarded after the consuming operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    nodes: Vec<Node>,
    root: NodeRef,
}

impl Network {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(cap),
            root: NodeRef(0),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeRef {
        let r = NodeRef(self.nodes.len() as u32);
        self.nodes.push(node);
        r
    }

    pub(crate) fn set_root(&mut self, root: NodeRef) {
        self.root = root;
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    pub fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.0 as usize]
    }

    pub fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        &mut self.nodes[r.0 as usize]
    }

    /// Total nodes allocated, including any made unreachable by bypassing.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
