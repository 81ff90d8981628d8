//! Range-overlap customizer.

use crate::model::{InstanceGraph, PropertyId, SlotValues};

use super::{InstanceMatcher, MatchCustomizer};

/// Overrides the comparison of one range-valued attribute on the root frame:
/// the match succeeds iff the query range and the stored range overlap
/// (non-empty intersection), instead of the base matcher's containment rule.
/// Point values are zero-width ranges. Every other attribute still flows
/// through the base matcher.
#[derive(Debug, Clone)]
pub struct RangeOverlapper {
    property: PropertyId,
}

impl RangeOverlapper {
    pub fn new(property: impl Into<PropertyId>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl MatchCustomizer for RangeOverlapper {
    fn intercept(
        &self,
        _base: &dyn InstanceMatcher,
        query: &mut InstanceGraph,
        stored: &mut InstanceGraph,
    ) -> Option<bool> {
        let q_slot = query.remove_slot(query.root(), &self.property)?;
        let SlotValues::Numbers(q_ranges) = q_slot.values else {
            // Not a numeric slot; restore and stand aside.
            query.set_slot(query.root(), q_slot);
            return None;
        };

        let Some(s_slot) = stored.remove_slot(stored.root(), &self.property) else {
            return Some(false);
        };
        let SlotValues::Numbers(s_ranges) = s_slot.values else {
            return Some(false);
        };

        Some(
            q_ranges
                .iter()
                .any(|q| s_ranges.iter().any(|s| q.overlaps(s))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{CustomizedMatcher, SubsumptionMatcher};
    use crate::model::{InstanceId, NumberRange, Slot, TypeTag};
    use crate::schema::MemorySchema;
    use std::sync::Arc;

    fn store_with(ranges: &[(u64, f64, f64)]) -> CustomizedMatcher<SubsumptionMatcher<MemorySchema>> {
        let mut schema = MemorySchema::new();
        schema.add_concept("Shift");
        let mut m = CustomizedMatcher::new(SubsumptionMatcher::new(Arc::new(schema)));
        m.register(Box::new(RangeOverlapper::new("hours")));
        for &(id, lo, hi) in ranges {
            let mut g = InstanceGraph::new(TypeTag::atomic("Shift"));
            g.set_slot(g.root(), Slot::numbers("hours", [NumberRange::new(lo, hi)]));
            m.add(InstanceId(id), g);
        }
        m
    }

    fn hours_query(lo: f64, hi: f64) -> InstanceGraph {
        let mut q = InstanceGraph::new(TypeTag::atomic("Shift"));
        q.set_slot(q.root(), Slot::numbers("hours", [NumberRange::new(lo, hi)]));
        q
    }

    #[test]
    fn test_overlap_instead_of_containment() {
        let m = store_with(&[(1, 10.0, 30.0)]);
        // [25, 40] does not contain [10, 30] but does overlap it.
        assert_eq!(m.query(&hours_query(25.0, 40.0)), vec![InstanceId(1)]);
        assert!(m.query(&hours_query(31.0, 40.0)).is_empty());
    }

    #[test]
    fn test_point_values_are_zero_width() {
        let m = store_with(&[(1, 20.0, 20.0)]);
        assert_eq!(m.query(&hours_query(20.0, 20.0)), vec![InstanceId(1)]);
        assert!(m.query(&hours_query(20.5, 21.0)).is_empty());
    }

    #[test]
    fn test_query_without_target_attribute_falls_through() {
        let m = store_with(&[(1, 10.0, 30.0)]);
        let q = InstanceGraph::new(TypeTag::atomic("Shift"));
        // No hours constraint in the query: base matcher alone decides.
        assert_eq!(m.query(&q), vec![InstanceId(1)]);
    }
}
