//! End-to-end tests for the network layer.
//!
//! Each test exercises: instance graph -> NetworkBuilder -> processors,
//! checking dedup, cycle safety, and the structural rewrites.

use framestore::network::reachable_nodes;
use framestore::{
    ConceptSwapper, EntityTypeSwapper, FrameStore, InstanceGraph, Link, LinkBypasser,
    MemorySchema, NetworkBuilder, NetworkProcessor, Node, NodeBypasser, NumberRange, Slot,
    TypeTag,
};

fn schema() -> MemorySchema {
    let mut s = MemorySchema::new();
    s.add_concept("Person")
        .add_concept("Employment")
        .add_concept("Employer")
        .add_concept("Job")
        .add_concept("Citizen");
    s
}

// ============================================================================
// 1. Dedup invariant: one node per source frame, shared by both links
// ============================================================================

#[test]
fn test_shared_frame_builds_one_node() {
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let job = g.add_frame(TypeTag::atomic("Job"));
    g.set_slot(g.root(), Slot::frames("dayJob", [job]));
    g.set_slot(g.root(), Slot::frames("favouriteJob", [job]));

    let s = schema();
    let net = NetworkBuilder::new(&s).build(&g).unwrap();

    let root = net.node(net.root());
    let a = root.link(&"dayJob".into()).unwrap().values[0];
    let b = root.link(&"favouriteJob".into()).unwrap().values[0];
    assert_eq!(a, b);
    // Exactly two nodes: the person and the one job.
    assert_eq!(net.len(), 2);
}

// ============================================================================
// 2. Cycle safety: mutual references terminate with a finite network
// ============================================================================

#[test]
fn test_cyclic_source_builds_finite_network() {
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let spouse = g.add_frame(TypeTag::atomic("Person"));
    g.set_slot(g.root(), Slot::frames("spouse", [spouse]));
    g.set_slot(spouse, Slot::frames("spouse", [g.root()]));

    let s = schema();
    let net = NetworkBuilder::new(&s).build(&g).unwrap();
    assert_eq!(net.len(), 2);
    assert_eq!(reachable_nodes(&net, net.root()).len(), 2);
}

// ============================================================================
// 3. LinkBypasser: no matching link reachable afterwards
// ============================================================================

#[test]
fn test_link_bypass_postcondition() {
    // Person -> Employment -> Employer, two levels of employment indirection
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let emp1 = g.add_frame(TypeTag::atomic("Employment"));
    let emp2 = g.add_frame(TypeTag::atomic("Employment"));
    let boss = g.add_frame(TypeTag::atomic("Employer"));
    g.set_slot(g.root(), Slot::frames("employment", [emp1]));
    g.set_slot(emp1, Slot::frames("employment", [emp2]));
    g.set_slot(emp2, Slot::frames("employer", [boss]));

    let s = schema();
    let mut net = NetworkBuilder::new(&s).build(&g).unwrap();
    let root = net.root();

    let pred = |l: &Link| l.property.as_str() == "employment";
    LinkBypasser::new(pred).process(&mut net, root);

    for n in reachable_nodes(&net, root) {
        assert!(net.node(n).links.iter().all(|l| !pred(l)));
    }
    // The employer relation surfaced on the root.
    assert!(net.node(root).link(&"employer".into()).is_some());
}

// ============================================================================
// 4. NodeBypasser: interior node removed, its targets spliced in
// ============================================================================

#[test]
fn test_node_bypass_splices_targets() {
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let emp = g.add_frame(TypeTag::atomic("Employment"));
    let boss_a = g.add_frame(TypeTag::atomic("Employer"));
    let boss_b = g.add_frame(TypeTag::atomic("Employer"));
    g.set_slot(g.root(), Slot::frames("employment", [emp]));
    g.set_slot(emp, Slot::frames("employer", [boss_a, boss_b]));

    let s = schema();
    let mut net = NetworkBuilder::new(&s).build(&g).unwrap();
    let root = net.root();

    NodeBypasser::new(|n: &Node| n.tag.atom().map(|c| c.as_str()) == Some("Employment"))
        .process(&mut net, root);

    let link = net.node(root).link(&"employment".into()).unwrap();
    assert_eq!(link.values.len(), 2);
    for &v in &link.values {
        assert_eq!(net.node(v).tag, TypeTag::atomic("Employer"));
    }
}

// ============================================================================
// 5. Swappers across a chained pipeline
// ============================================================================

#[test]
fn test_swap_then_bypass_pipeline() {
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let emp = g.add_frame(TypeTag::atomic("Employment"));
    g.set_slot(g.root(), Slot::frames("employment", [emp]));
    g.set_slot(emp, Slot::numbers("hours", [NumberRange::point(40.0)]));

    let s = schema();
    let mut net = NetworkBuilder::new(&s).build(&g).unwrap();
    let root = net.root();

    ConceptSwapper::new("Employment", "Job").process(&mut net, root);
    EntityTypeSwapper::new("hours", "hoursPerWeek").process(&mut net, root);

    let emp_node = net.node(root).link(&"employment".into()).unwrap().values[0];
    assert_eq!(net.node(emp_node).tag, TypeTag::atomic("Job"));
    assert!(net.node(emp_node).numeric(&"hoursPerWeek".into()).is_some());
}

// ============================================================================
// 6. Store surface: build_network on a stored instance
// ============================================================================

#[test]
fn test_store_builds_network() {
    let store = FrameStore::new(schema());

    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    g.set_slot(g.root(), Slot::types("citizenship", ["Citizen"]));
    let id = store.add_instance(g).unwrap();

    let net = store.build_network(id).unwrap();
    let link = net.node(net.root()).link(&"citizenship".into()).unwrap();
    assert_eq!(
        net.node(link.values[0]).tag,
        TypeTag::atomic("Citizen")
    );
}
