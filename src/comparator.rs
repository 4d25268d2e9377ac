use std::{cmp::Ordering, ops::Range};

/// A total ordering over interval keys of type `K`.
///
/// An [`IntervalTree`](crate::IntervalTree) never inspects the representation
/// of the keys it stores: every placement and search decision is made through
/// the three comparisons of this trait.
///
/// Implementations must be pure and each comparison must be transitive and
/// antisymmetric. They need not be consistent with [`Eq`]: two distinct keys
/// may compare as equivalent intervals.
///
/// Violating these requirements does not cause memory unsafety, but the tree
/// order (and therefore every query result) becomes unspecified.
pub trait IntervalComparator<K> {
    /// Order `a` and `b` by their lower bounds.
    fn compare_mins(&self, a: &K, b: &K) -> Ordering;

    /// Order `a` and `b` by their upper bounds.
    fn compare_maxes(&self, a: &K, b: &K) -> Ordering;

    /// Order the lower bound of `a` against the upper bound of `b`.
    ///
    /// A result of [`Ordering::Less`] means `a` starts before `b` ends.
    fn compare_min_to_max(&self, a: &K, b: &K) -> Ordering;

    /// The order the tree stores keys in: by lower bound, tie-broken by the
    /// upper bound.
    fn compare_order(&self, a: &K, b: &K) -> Ordering {
        self.compare_mins(a, b)
            .then_with(|| self.compare_maxes(a, b))
    }
}

impl<K, C> IntervalComparator<K> for &C
where
    C: IntervalComparator<K> + ?Sized,
{
    fn compare_mins(&self, a: &K, b: &K) -> Ordering {
        (**self).compare_mins(a, b)
    }

    fn compare_maxes(&self, a: &K, b: &K) -> Ordering {
        (**self).compare_maxes(a, b)
    }

    fn compare_min_to_max(&self, a: &K, b: &K) -> Ordering {
        (**self).compare_min_to_max(a, b)
    }
}

/// The comparator for half-open intervals `[start, end)`, implemented for
/// [`Range<T>`] and two-element `[start, end]` arrays.
///
/// # Degenerate Intervals
///
/// An empty interval `[p, p)` is treated as the point `p`, so that point
/// queries can be expressed with a 0-length key:
///
/// * `[3, 3)` intersects `[2, 4)`, `[3, 5)` and `[3, 3)`, but not `[1, 3)`.
/// * `[3, 3)` is a subset of `[3, 5)`, but not of `[1, 3)`.
///
/// To achieve this, [`compare_maxes`] orders a degenerate interval after a
/// non-degenerate interval with the same upper bound, and
/// [`compare_min_to_max`] reports a lower bound equal to the upper bound of a
/// degenerate interval as [`Ordering::Less`] (the point lies "inside" it).
///
/// Intervals with `start > end` are invalid and are not detected; query results
/// involving them are unspecified.
///
/// [`compare_maxes`]: IntervalComparator::compare_maxes
/// [`compare_min_to_max`]: IntervalComparator::compare_min_to_max
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HalfOpen;

/// Access to the bounds of a half-open interval representation.
trait Bounds<T> {
    fn lower(&self) -> &T;
    fn upper(&self) -> &T;
}

impl<T> Bounds<T> for Range<T> {
    fn lower(&self) -> &T {
        &self.start
    }

    fn upper(&self) -> &T {
        &self.end
    }
}

impl<T> Bounds<T> for [T; 2] {
    fn lower(&self) -> &T {
        &self[0]
    }

    fn upper(&self) -> &T {
        &self[1]
    }
}

fn is_point<T: Ord>(v: &impl Bounds<T>) -> bool {
    v.lower() == v.upper()
}

fn compare_maxes<T: Ord>(a: &impl Bounds<T>, b: &impl Bounds<T>) -> Ordering {
    a.upper()
        .cmp(b.upper())
        .then_with(|| is_point(a).cmp(&is_point(b)))
}

fn compare_min_to_max<T: Ord>(a: &impl Bounds<T>, b: &impl Bounds<T>) -> Ordering {
    match a.lower().cmp(b.upper()) {
        Ordering::Equal if is_point(b) => Ordering::Less,
        v => v,
    }
}

impl<T> IntervalComparator<Range<T>> for HalfOpen
where
    T: Ord,
{
    fn compare_mins(&self, a: &Range<T>, b: &Range<T>) -> Ordering {
        a.start.cmp(&b.start)
    }

    fn compare_maxes(&self, a: &Range<T>, b: &Range<T>) -> Ordering {
        compare_maxes(a, b)
    }

    fn compare_min_to_max(&self, a: &Range<T>, b: &Range<T>) -> Ordering {
        compare_min_to_max(a, b)
    }
}

impl<T> IntervalComparator<[T; 2]> for HalfOpen
where
    T: Ord,
{
    fn compare_mins(&self, a: &[T; 2], b: &[T; 2]) -> Ordering {
        a[0].cmp(&b[0])
    }

    fn compare_maxes(&self, a: &[T; 2], b: &[T; 2]) -> Ordering {
        compare_maxes(a, b)
    }

    fn compare_min_to_max(&self, a: &[T; 2], b: &[T; 2]) -> Ordering {
        compare_min_to_max(a, b)
    }
}
