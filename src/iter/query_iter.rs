use std::{fmt::Debug, iter::FusedIterator};

use crate::{
    comparator::IntervalComparator,
    node::NodeId,
    query::{Direction, Query},
    tree::IntervalTree,
};

/// An [`Iterator`] over references to the `(interval, value)` tuples selected
/// by a [`Query`].
///
/// The iterator walks matches from both ends: `next()` yields them in the
/// iterator's direction and `next_back()` in the reverse, until the two ends
/// meet.
pub struct Iter<'a, 'q, K, V, C> {
    tree: &'a IntervalTree<K, V, C>,
    query: Query<'q, K>,
    direction: Direction,

    /// The next match to yield from the front / back, or [`None`] once the
    /// ends have met.
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<K, V, C> Debug for Iter<'_, '_, K, V, C>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("query", &self.query)
            .field("direction", &self.direction)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}

impl<K, V, C> Clone for Iter<'_, '_, K, V, C> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, 'q, K, V, C> Iter<'a, 'q, K, V, C>
where
    C: IntervalComparator<K>,
{
    pub(crate) fn new(
        tree: &'a IntervalTree<K, V, C>,
        query: Query<'q, K>,
        direction: Direction,
    ) -> Self {
        let head = tree.find_extreme(&query, direction);
        let tail = head.and_then(|_| tree.find_extreme(&query, direction.reverse()));

        Self {
            tree,
            query,
            direction,
            head,
            tail,
        }
    }

    /// Begin iterating at `head` (a match, or [`None`]), running to the last
    /// match in `direction`.
    pub(crate) fn starting_at(
        tree: &'a IntervalTree<K, V, C>,
        query: Query<'q, K>,
        direction: Direction,
        head: Option<NodeId>,
    ) -> Self {
        let tail = head.and_then(|_| tree.find_extreme(&query, direction.reverse()));

        Self {
            tree,
            query,
            direction,
            head,
            tail,
        }
    }

    /// Take the next node from the front.
    pub(crate) fn next_node(&mut self) -> Option<NodeId> {
        let n = self.head?;
        if self.head == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.head = self.tree.find_next(&self.query, n, self.direction);
        }
        Some(n)
    }

    fn next_back_node(&mut self) -> Option<NodeId> {
        let n = self.tail?;
        if self.head == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.tail = self
                .tree
                .find_next(&self.query, n, self.direction.reverse());
        }
        Some(n)
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, '_, K, V, C>
where
    C: IntervalComparator<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.next_node().map(|n| tree.entry_ref(n))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, '_, K, V, C>
where
    C: IntervalComparator<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.next_back_node().map(|n| tree.entry_ref(n))
    }
}

impl<K, V, C> FusedIterator for Iter<'_, '_, K, V, C> where C: IntervalComparator<K> {}
