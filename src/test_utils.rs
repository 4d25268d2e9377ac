use std::ops::Range;

use proptest::prelude::*;

use crate::IntervalTree;

const RANGE_MAX: usize = 20;

/// Generate arbitrary valid ranges with bounds from [0..[`RANGE_MAX`]).
///
/// Roughly one in [`RANGE_MAX`] of the generated ranges are degenerate
/// (`start == end`) and therefore represent a single point.
pub(crate) fn arbitrary_range() -> impl Strategy<Value = Range<usize>> {
    (0..RANGE_MAX, 0..RANGE_MAX).prop_map(|(a, b)| Range {
        start: a.min(b),
        end: a.max(b),
    })
}

/// Return the keys of `t` in ascending order.
pub(crate) fn keys_of<V>(t: &IntervalTree<Range<usize>, V>) -> Vec<Range<usize>> {
    t.keys().cloned().collect()
}

fn is_point(r: &Range<usize>) -> bool {
    r.start == r.end
}

/// Returns true if the point `p` lies within `r`.
fn model_contains_point(r: &Range<usize>, p: usize) -> bool {
    if is_point(r) {
        return r.start == p;
    }
    r.contains(&p)
}

/// A brute-force test that `a` and `b` share at least one point.
pub(crate) fn model_intersects(a: &Range<usize>, b: &Range<usize>) -> bool {
    match (is_point(a), is_point(b)) {
        (true, _) => model_contains_point(b, a.start),
        (_, true) => model_contains_point(a, b.start),
        (false, false) => a.start < b.end && b.start < a.end,
    }
}

/// Returns true if every point of `b` is also a point of `a`.
pub(crate) fn model_superset(a: &Range<usize>, b: &Range<usize>) -> bool {
    match (is_point(a), is_point(b)) {
        (_, true) => model_contains_point(a, b.start),
        // A single point never contains a span.
        (true, false) => false,
        (false, false) => a.start <= b.start && b.end <= a.end,
    }
}

/// Returns true if every point of `a` is also a point of `b`.
pub(crate) fn model_subset(a: &Range<usize>, b: &Range<usize>) -> bool {
    model_superset(b, a)
}

/// Returns true if every point of `q` lies within at least one of `values`.
///
/// Spans have integer bounds, so a span is covered when every unit step
/// `[x, x + 1)` within it is covered by a stored span. Stored points cannot
/// fill a gap in a span.
pub(crate) fn model_covers(values: &[Range<usize>], q: &Range<usize>) -> bool {
    if is_point(q) {
        return values.iter().any(|v| model_contains_point(v, q.start));
    }

    q.clone()
        .all(|x| values.iter().any(|v| !is_point(v) && v.contains(&x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_points() {
        assert!(model_intersects(&(3..3), &(1..4)));
        assert!(!model_intersects(&(4..4), &(1..4)));
        assert!(model_intersects(&(1..1), &(1..4)));

        // [p, p + 1) is a span, and is not contained by the point p.
        assert!(!model_superset(&(2..2), &(2..3)));
        assert!(model_superset(&(2..3), &(2..2)));
        assert!(model_subset(&(2..2), &(2..2)));

        assert!(model_covers(&[0..2, 2..4], &(1..4)));
        assert!(!model_covers(&[0..2, 2..2, 3..4], &(1..4)));
        assert!(model_covers(&[5..5], &(5..5)));
    }
}
