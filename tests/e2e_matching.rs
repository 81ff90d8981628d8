//! End-to-end tests for the match customizer chain.
//!
//! Each test exercises: store instances -> customizer rewrites -> query
//! through the chain -> base matcher residual.

use framestore::{
    AggregateMode, Aggregator, FrameStore, InstanceGraph, InstanceId, MemorySchema, NumberRange,
    RangeOverlapper, SectionInverter, Slot, TypeTag,
};

fn schema() -> MemorySchema {
    let mut s = MemorySchema::new();
    s.add_concept("Person")
        .add_concept("Job")
        .add_subconcept("NightJob", "Job")
        .add_concept("Specialty")
        .add_subconcept("Medicine", "Specialty")
        .add_subconcept("Surgery", "Medicine");
    s
}

fn person_with_jobs(hours: &[f64]) -> InstanceGraph {
    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    let jobs: Vec<_> = hours
        .iter()
        .map(|&h| {
            let job = g.add_frame(TypeTag::atomic("Job"));
            g.set_slot(job, Slot::numbers("hoursPerWeek", [NumberRange::point(h)]));
            job
        })
        .collect();
    g.set_slot(g.root(), Slot::frames("jobs", jobs));
    g
}

fn total_hours_query(lo: f64, hi: f64) -> InstanceGraph {
    let mut q = InstanceGraph::new(TypeTag::atomic("Person"));
    q.set_slot(q.root(), Slot::numbers("totalHours", [NumberRange::new(lo, hi)]));
    q
}

// ============================================================================
// 1. Aggregator round-trip: span over sub-frame values
// ============================================================================

#[test]
fn test_span_aggregate_round_trip() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(Aggregator::new(
        "jobs",
        "hoursPerWeek",
        "totalHours",
        AggregateMode::Span,
    )));

    let id = store
        .add_instance(person_with_jobs(&[15.0, 30.0, 20.0, 20.0]))
        .unwrap();

    // Aggregate is exactly [15, 30]: queries match iff they intersect it.
    assert_eq!(store.query(&total_hours_query(25.0, 40.0)), vec![id]);
    assert_eq!(store.query(&total_hours_query(10.0, 15.0)), vec![id]);
    assert!(store.query(&total_hours_query(35.0, 45.0)).is_empty());
}

// ============================================================================
// 2. Worked scenario: sum-aggregated hours across multiple jobs
// ============================================================================

#[test]
fn test_sum_aggregate_selects_multi_job_worker() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(Aggregator::new(
        "jobs",
        "hoursPerWeek",
        "totalHours",
        AggregateMode::Sum,
    )));

    // One job at 20h: total 20. Two jobs at 20h each: total 40.
    let single = store.add_instance(person_with_jobs(&[20.0])).unwrap();
    let double = store.add_instance(person_with_jobs(&[20.0, 20.0])).unwrap();

    // [35, 45] catches only the 40-hour total.
    assert_eq!(store.query(&total_hours_query(35.0, 45.0)), vec![double]);
    assert_eq!(store.query(&total_hours_query(15.0, 25.0)), vec![single]);
}

// ============================================================================
// 3. Aggregation leaves the residual sub-structure matchable
// ============================================================================

#[test]
fn test_aggregated_section_residual_still_matches() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(Aggregator::new(
        "jobs",
        "hoursPerWeek",
        "totalHours",
        AggregateMode::Span,
    )));

    let mut night_worker = InstanceGraph::new(TypeTag::atomic("Person"));
    let job = night_worker.add_frame(TypeTag::atomic("NightJob"));
    night_worker.set_slot(job, Slot::numbers("hoursPerWeek", [NumberRange::point(20.0)]));
    night_worker.set_slot(night_worker.root(), Slot::frames("jobs", [job]));
    let id = store.add_instance(night_worker).unwrap();

    let day_worker = store.add_instance(person_with_jobs(&[20.0])).unwrap();

    // Query: anyone whose jobs include a NightJob, total hours around 20.
    let mut q = total_hours_query(15.0, 25.0);
    let njob = q.add_frame(TypeTag::atomic("NightJob"));
    q.set_slot(q.root(), Slot::frames("jobs", [njob]));

    let hits = store.query(&q);
    assert_eq!(hits, vec![id]);
    assert!(!hits.contains(&day_worker));
}

// ============================================================================
// 4. Range overlap: override replaces containment for one attribute
// ============================================================================

#[test]
fn test_overlap_override_is_attribute_local() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(RangeOverlapper::new("experience")));

    let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
    g.set_slot(g.root(), Slot::numbers("experience", [NumberRange::new(5.0, 15.0)]));
    g.set_slot(g.root(), Slot::numbers("age", [NumberRange::point(40.0)]));
    let id = store.add_instance(g).unwrap();

    // experience overlaps but the stored value is not contained; age still
    // uses containment.
    let mut q = InstanceGraph::new(TypeTag::atomic("Person"));
    q.set_slot(q.root(), Slot::numbers("experience", [NumberRange::new(10.0, 20.0)]));
    q.set_slot(q.root(), Slot::numbers("age", [NumberRange::new(35.0, 45.0)]));
    assert_eq!(store.query(&q), vec![id]);

    // Non-overlapping experience fails even though age matches.
    let mut q2 = InstanceGraph::new(TypeTag::atomic("Person"));
    q2.set_slot(q2.root(), Slot::numbers("experience", [NumberRange::new(20.0, 30.0)]));
    q2.set_slot(q2.root(), Slot::numbers("age", [NumberRange::new(35.0, 45.0)]));
    assert!(store.query(&q2).is_empty());

    // Overlapping experience with a failing age: the residual still vetoes.
    let mut q3 = InstanceGraph::new(TypeTag::atomic("Person"));
    q3.set_slot(q3.root(), Slot::numbers("experience", [NumberRange::new(10.0, 20.0)]));
    q3.set_slot(q3.root(), Slot::numbers("age", [NumberRange::new(20.0, 30.0)]));
    assert!(store.query(&q3).is_empty());
}

// ============================================================================
// 5. Section inversion: stored value must subsume the query's
// ============================================================================

#[test]
fn test_section_inversion_direction() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(SectionInverter::new("specialty")));

    let with_specialty = |c: &str| {
        let mut g = InstanceGraph::new(TypeTag::atomic("Person"));
        let spec = g.add_frame(TypeTag::atomic(c));
        g.set_slot(g.root(), Slot::frames("specialty", [spec]));
        g
    };

    let broad = store.add_instance(with_specialty("Medicine")).unwrap();
    let narrow = store.add_instance(with_specialty("Surgery")).unwrap();

    // Narrow query: matched by the broader and the equal stored value.
    let hits = store.query(&with_specialty("Surgery"));
    assert!(hits.contains(&broad));
    assert!(hits.contains(&narrow));

    // Broad query: only the broader stored value subsumes it.
    assert_eq!(store.query(&with_specialty("Medicine")), vec![broad]);
}

// ============================================================================
// 6. Chain composition: aggregator and inverter cooperate on one store
// ============================================================================

#[test]
fn test_chain_composition() {
    let store = FrameStore::new(schema());
    store.register_customizer(Box::new(Aggregator::new(
        "jobs",
        "hoursPerWeek",
        "totalHours",
        AggregateMode::Sum,
    )));
    store.register_customizer(Box::new(SectionInverter::new("specialty")));

    let mut g = person_with_jobs(&[20.0, 20.0]);
    let spec = g.add_frame(TypeTag::atomic("Medicine"));
    g.set_slot(g.root(), Slot::frames("specialty", [spec]));
    let id = store.add_instance(g).unwrap();

    let mut q = total_hours_query(35.0, 45.0);
    let qspec = q.add_frame(TypeTag::atomic("Surgery"));
    q.set_slot(q.root(), Slot::frames("specialty", [qspec]));

    assert_eq!(store.query(&q), vec![id]);

    // A failing aggregate vetoes despite the specialty agreeing.
    let mut q2 = total_hours_query(50.0, 60.0);
    let q2spec = q2.add_frame(TypeTag::atomic("Surgery"));
    q2.set_slot(q2.root(), Slot::frames("specialty", [q2spec]));
    assert!(store.query(&q2).is_empty());
}

// ============================================================================
// 7. Ranking is deterministic: exact-tag hits first, then id order
// ============================================================================

#[test]
fn test_ranking_order() {
    let mut s = MemorySchema::new();
    s.add_concept("Animal").add_subconcept("Dog", "Animal");
    let store = FrameStore::new(s);

    let dog = store
        .add_instance(InstanceGraph::new(TypeTag::atomic("Dog")))
        .unwrap();
    let animal = store
        .add_instance(InstanceGraph::new(TypeTag::atomic("Animal")))
        .unwrap();

    let hits = store.query(&InstanceGraph::new(TypeTag::atomic("Animal")));
    // Exact Animal match outranks the subsumed Dog despite its higher id.
    assert_eq!(hits, vec![animal, dog]);
    assert_eq!(hits, vec![InstanceId(2), InstanceId(1)]);
}
