//! Query families and the pruned search shared by all of them.
//!
//! Every family is described by a [`Query`] that answers four questions about
//! a node: does it match, can its subtree (bounded by the subtree `max_stop`)
//! contain a match, and can anything ordered before / after it match. A single
//! search state machine uses those answers to find the first / last match in
//! a subtree, and the next / previous match after any node.

use std::cmp::Ordering;

use crate::{
    comparator::IntervalComparator,
    node::{NodeId, Side},
    tree::IntervalTree,
};

/// Selects which stored intervals a search, iterator or view yields, relative
/// to a query interval `q`.
///
/// For a stored interval `n`:
///
/// | Variant          | Yields `n` when                                   |
/// |------------------|---------------------------------------------------|
/// | `All`            | always                                            |
/// | `Equivalent(q)`  | `n` and `q` have equal lower and upper bounds     |
/// | `Intersecting(q)`| `n` starts before `q` ends, and `q` before `n`    |
/// | `Superset(q)`    | `n` contains `q`                                  |
/// | `Subset(q)`      | `n` is contained by `q`                           |
///
/// All comparisons are made through the tree's
/// [`IntervalComparator`](crate::IntervalComparator).
#[derive(Debug)]
pub enum Query<'a, K> {
    /// Every stored interval.
    All,
    /// Intervals with the same bounds as the query.
    Equivalent(&'a K),
    /// Intervals overlapping the query.
    Intersecting(&'a K),
    /// Intervals that contain the query.
    Superset(&'a K),
    /// Intervals contained by the query.
    Subset(&'a K),
}

impl<K> Clone for Query<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Query<'_, K> {}

impl<'a, K> Query<'a, K> {
    /// Returns true if the interval `n` satisfies this query.
    pub(crate) fn matches<C>(&self, c: &C, n: &K) -> bool
    where
        C: IntervalComparator<K>,
    {
        match *self {
            Self::All => true,
            Self::Equivalent(q) => c.compare_order(q, n) == Ordering::Equal,
            Self::Intersecting(q) => {
                c.compare_min_to_max(q, n) == Ordering::Less
                    && c.compare_min_to_max(n, q) == Ordering::Less
            }
            Self::Superset(q) => {
                c.compare_mins(q, n) != Ordering::Less
                    && c.compare_maxes(q, n) != Ordering::Greater
            }
            Self::Subset(q) => {
                c.compare_mins(q, n) != Ordering::Greater
                    && c.compare_maxes(q, n) != Ordering::Less
            }
        }
    }

    /// Returns false when no interval in a subtree whose greatest upper bound
    /// is held by `max_stop` can satisfy this query.
    fn reachable<C>(&self, c: &C, max_stop: &K) -> bool
    where
        C: IntervalComparator<K>,
    {
        match *self {
            Self::All => true,
            // Equal upper bounds require the subtree to reach at least q's.
            Self::Equivalent(q) | Self::Superset(q) => {
                c.compare_maxes(q, max_stop) != Ordering::Greater
            }
            // Something in the subtree must end after q starts.
            Self::Intersecting(q) => c.compare_min_to_max(q, max_stop) == Ordering::Less,
            // A subset starts at or after q, so must end no earlier.
            Self::Subset(q) => c.compare_min_to_max(q, max_stop) != Ordering::Greater,
        }
    }

    /// Returns false when neither `n` nor any interval ordered before it can
    /// satisfy this query.
    ///
    /// This is monotone: once false for some interval, it is false for all
    /// intervals ordered before it.
    fn continue_before<C>(&self, c: &C, n: &K) -> bool
    where
        C: IntervalComparator<K>,
    {
        match *self {
            Self::All | Self::Intersecting(_) | Self::Superset(_) => true,
            Self::Equivalent(q) => c.compare_order(n, q) != Ordering::Less,
            Self::Subset(q) => c.compare_mins(n, q) != Ordering::Less,
        }
    }

    /// Returns false when neither `n` nor any interval ordered after it can
    /// satisfy this query.
    ///
    /// This is monotone: once false for some interval, it is false for all
    /// intervals ordered after it.
    fn continue_after<C>(&self, c: &C, n: &K) -> bool
    where
        C: IntervalComparator<K>,
    {
        match *self {
            Self::All => true,
            Self::Equivalent(q) => c.compare_order(n, q) != Ordering::Greater,
            // Every later interval starts at or after q ends.
            Self::Intersecting(q) | Self::Subset(q) => {
                c.compare_min_to_max(n, q) == Ordering::Less
            }
            // Every later interval starts after q starts.
            Self::Superset(q) => c.compare_mins(n, q) != Ordering::Greater,
        }
    }
}

/// The order in which a search, iterator or view visits matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Lowest to highest interval order.
    #[default]
    Ascending,
    /// Highest to lowest interval order.
    Descending,
}

impl Direction {
    /// Return the opposite [`Direction`].
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// The child visited before a node.
    fn near(self) -> Side {
        match self {
            Self::Ascending => Side::Left,
            Self::Descending => Side::Right,
        }
    }
}

/// The search state machine.
///
/// A search is either descending into a subtree it has not yet explored, or
/// ascending out of one it has exhausted. `Visit` is the moment between the
/// two, when a node's near subtree is finished and the node itself is tested.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Descend into an unexplored subtree.
    Descend(NodeId),
    /// The near subtree of the node is exhausted: test the node, then descend
    /// into its far subtree.
    Visit(NodeId),
    /// The node's subtree is exhausted: resume from its parent.
    Ascend(NodeId),
}

impl<K, V, C> IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    /// Return the first match of `query` in `direction` within the whole tree.
    pub(crate) fn find_extreme(&self, query: &Query<'_, K>, direction: Direction) -> Option<NodeId> {
        self.run(query, direction, Step::Descend(self.root?))
    }

    /// Return the match of `query` that follows `from` in `direction`.
    ///
    /// `from` need not match the query itself.
    pub(crate) fn find_next(
        &self,
        query: &Query<'_, K>,
        from: NodeId,
        direction: Direction,
    ) -> Option<NodeId> {
        let far = direction.near().opposite();
        if !self.continue_toward(query, from, direction) {
            return None;
        }
        match self.nodes[from].child(far) {
            Some(child) => self.run(query, direction, Step::Descend(child)),
            None => self.run(query, direction, Step::Ascend(from)),
        }
    }

    /// Drive the down / up search from `step` until a node matches (found) or
    /// the search climbs out of the root (exhausted).
    fn run(&self, query: &Query<'_, K>, direction: Direction, mut step: Step) -> Option<NodeId> {
        let near = direction.near();
        let far = near.opposite();
        let c = &self.comparator;

        loop {
            step = match step {
                Step::Descend(n) => {
                    let node = &self.nodes[n];
                    if !query.reachable(c, &self.nodes[node.max_stop].key) {
                        Step::Ascend(n)
                    } else if !self.continue_toward(query, n, direction.reverse()) {
                        // Nothing up to and including n can match: skip
                        // straight to the far subtree.
                        match node.child(far) {
                            Some(child) => Step::Descend(child),
                            None => Step::Ascend(n),
                        }
                    } else {
                        match node.child(near) {
                            Some(child) => Step::Descend(child),
                            None => Step::Visit(n),
                        }
                    }
                }
                Step::Visit(n) => {
                    let node = &self.nodes[n];
                    if query.matches(c, &node.key) {
                        return Some(n);
                    }
                    if !self.continue_toward(query, n, direction) {
                        // Nothing from n onwards can match.
                        return None;
                    }
                    match node.child(far) {
                        Some(child) => Step::Descend(child),
                        None => Step::Ascend(n),
                    }
                }
                Step::Ascend(n) => {
                    let parent = self.nodes[n].parent?;
                    if self.nodes[parent].child(near) == Some(n) {
                        Step::Visit(parent)
                    } else {
                        Step::Ascend(parent)
                    }
                }
            };
        }
    }

    fn continue_toward(&self, query: &Query<'_, K>, n: NodeId, direction: Direction) -> bool {
        let key = &self.nodes[n].key;
        match direction {
            Direction::Ascending => query.continue_after(&self.comparator, key),
            Direction::Descending => query.continue_before(&self.comparator, key),
        }
    }

    /// Return true if the union of all stored intervals covers `q`.
    ///
    /// Walks the intervals intersecting `q` in ascending order, growing a
    /// covered prefix of `q` (tracked by the interval reaching furthest so
    /// far) until it spans the upper bound of `q`, or a gap appears.
    pub(crate) fn union_covers(&self, q: &K) -> bool {
        let c = &self.comparator;
        let query = Query::Intersecting(q);

        let Some(first) = self.find_extreme(&query, Direction::Ascending) else {
            return false;
        };

        // The lower bound of q must itself be covered.
        if c.compare_mins(&self.nodes[first].key, q) == Ordering::Greater {
            return false;
        }

        let mut reach = first;
        let mut ptr = Some(first);
        while let Some(n) = ptr {
            let key = &self.nodes[n].key;
            let reach_key = &self.nodes[reach].key;

            if c.compare_min_to_max(key, reach_key) == Ordering::Greater {
                // Gap between the covered prefix and n.
                return false;
            }
            if c.compare_maxes(key, reach_key) == Ordering::Greater {
                reach = n;
            }
            if c.compare_maxes(&self.nodes[reach].key, q) != Ordering::Less {
                return true;
            }

            ptr = self.find_next(&query, n, Direction::Ascending);
        }

        false
    }

    /// Return the subtree node with the smallest upper bound.
    ///
    /// Scans in ascending order, stopping once intervals start at or after the
    /// best upper bound seen (they cannot end earlier than they start).
    pub(crate) fn find_first_by_max(&self) -> Option<NodeId> {
        let c = &self.comparator;
        let mut best = self.find_extreme(&Query::All, Direction::Ascending)?;
        let mut ptr = self.find_next(&Query::All, best, Direction::Ascending);

        while let Some(n) = ptr {
            let key = &self.nodes[n].key;
            if c.compare_min_to_max(key, &self.nodes[best].key) != Ordering::Less {
                break;
            }
            if c.compare_maxes(key, &self.nodes[best].key) == Ordering::Less {
                best = n;
            }
            ptr = self.find_next(&Query::All, n, Direction::Ascending);
        }

        Some(best)
    }

    /// The right-most node of the subtree rooted at `n`.
    pub(crate) fn subtree_last(&self, mut n: NodeId) -> NodeId {
        while let Some(right) = self.nodes[n].right {
            n = right;
        }
        n
    }
}
