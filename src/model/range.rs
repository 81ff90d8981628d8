//! Inclusive numeric ranges.
//!
//! Every numeric value in the frame model is a range; an exact point is a
//! zero-width range. Overlap and containment are the two comparisons the
//! matcher cares about.

use serde::{Deserialize, Serialize};

/// Inclusive numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    /// A proper range. `min` must not exceed `max`.
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "inverted range [{min}, {max}]");
        Self { min, max }
    }

    /// An exact value as a zero-width range.
    pub fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Non-empty intersection test: `max(a.min, b.min) <= min(a.max, b.max)`.
    pub fn overlaps(&self, other: &NumberRange) -> bool {
        self.min.max(other.min) <= self.max.min(other.max)
    }

    /// `self` fully covers `other` (the subsumption direction for numerics).
    pub fn contains(&self, other: &NumberRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Smallest range covering every input, or `None` for an empty iterator.
    pub fn span(ranges: impl IntoIterator<Item = NumberRange>) -> Option<NumberRange> {
        let mut iter = ranges.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| NumberRange {
            min: acc.min.min(r.min),
            max: acc.max.max(r.max),
        }))
    }

    /// Pointwise sum of ranges, or `None` for an empty iterator.
    pub fn sum(ranges: impl IntoIterator<Item = NumberRange>) -> Option<NumberRange> {
        let mut iter = ranges.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| NumberRange {
            min: acc.min + r.min,
            max: acc.max + r.max,
        }))
    }
}

impl From<f64> for NumberRange {
    fn from(v: f64) -> Self {
        NumberRange::point(v)
    }
}

impl From<i64> for NumberRange {
    fn from(v: i64) -> Self {
        NumberRange::point(v as f64)
    }
}

impl std::fmt::Display for NumberRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_point_overlap() {
        let p = NumberRange::point(20.0);
        assert!(p.overlaps(&NumberRange::new(15.0, 30.0)));
        assert!(!p.overlaps(&NumberRange::new(35.0, 45.0)));
    }

    #[test]
    fn test_span() {
        let span = NumberRange::span([
            NumberRange::point(15.0),
            NumberRange::point(30.0),
            NumberRange::point(20.0),
        ])
        .unwrap();
        assert_eq!(span, NumberRange::new(15.0, 30.0));
        assert_eq!(NumberRange::span(std::iter::empty()), None);
    }

    #[test]
    fn test_sum() {
        let sum = NumberRange::sum([
            NumberRange::new(10.0, 20.0),
            NumberRange::point(5.0),
        ])
        .unwrap();
        assert_eq!(sum, NumberRange::new(15.0, 25.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in -1e6f64..1e6, b in 0f64..1e3, c in -1e6f64..1e6, d in 0f64..1e3) {
            let q = NumberRange::new(a, a + b);
            let s = NumberRange::new(c, c + d);
            prop_assert_eq!(q.overlaps(&s), s.overlaps(&q));
            prop_assert_eq!(q.overlaps(&s), q.min.max(s.min) <= q.max.min(s.max));
        }

        #[test]
        fn contains_implies_overlap(a in -1e6f64..1e6, b in 0f64..1e3, c in 0f64..400.0, d in 0f64..400.0) {
            let outer = NumberRange::new(a, a + b);
            let inner = NumberRange::new(a + b * (c / 1000.0), a + b * (1.0 - d / 1000.0).max(c / 1000.0));
            prop_assert!(outer.contains(&inner));
            prop_assert!(outer.overlaps(&inner));
        }
    }
}
