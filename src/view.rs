use std::fmt::Debug;

use tracing::trace;

use crate::{
    comparator::IntervalComparator,
    cursor::Cursor,
    iter::Iter,
    node::NodeId,
    query::{Direction, Query},
    tree::IntervalTree,
};

/// A lazy, read-only projection of the entries of an [`IntervalTree`] selected
/// by a [`Query`], visited in a [`Direction`].
///
/// A [`View`] stores nothing: every call searches the tree. Navigation methods
/// ([`higher()`], [`lower()`], ...) are relative to the view's direction, so
/// for a descending view [`higher()`] returns the nearest match ordered
/// *before* the key.
///
/// ```
/// use interrb::{IntervalTree, Query};
///
/// let t = [(1..4, 'a'), (2..3, 'b'), (5..9, 'c'), (6..7, 'd')]
///     .into_iter()
///     .collect::<IntervalTree<_, _>>();
///
/// let q = 2..7;
/// let view = t.query(Query::Intersecting(&q));
/// assert_eq!(view.len(), 4);
/// assert_eq!(view.higher(&(2..3)), Some((&(5..9), &'c')));
///
/// let rev = view.rev();
/// assert_eq!(rev.first(), Some((&(6..7), &'d')));
/// assert_eq!(rev.higher(&(5..9)), Some((&(2..3), &'b')));
/// ```
///
/// [`higher()`]: View::higher
/// [`lower()`]: View::lower
pub struct View<'a, 'q, K, V, C> {
    tree: &'a IntervalTree<K, V, C>,
    query: Query<'q, K>,
    direction: Direction,
}

impl<K, V, C> Debug for View<'_, '_, K, V, C>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("query", &self.query)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<K, V, C> Clone for View<'_, '_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for View<'_, '_, K, V, C> {}

impl<'a, 'q, K, V, C> View<'a, 'q, K, V, C>
where
    C: IntervalComparator<K>,
{
    pub(crate) fn new(tree: &'a IntervalTree<K, V, C>, query: Query<'q, K>) -> Self {
        Self {
            tree,
            query,
            direction: Direction::Ascending,
        }
    }

    /// Return this view with its direction reversed.
    pub fn rev(self) -> Self {
        Self {
            direction: self.direction.reverse(),
            ..self
        }
    }

    /// Return the direction this view is visited in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterate over the `(interval, value)` tuples in this view.
    pub fn iter(&self) -> Iter<'a, 'q, K, V, C> {
        Iter::new(self.tree, self.query, self.direction)
    }

    /// Iterate over the tuples in this view, starting from the first match at
    /// or after `key` (in view order).
    pub fn iter_from(&self, key: &K) -> Iter<'a, 'q, K, V, C> {
        let head = self.seek(key, true);
        Iter::starting_at(self.tree, self.query, self.direction, head)
    }

    /// Iterate over the keys in this view.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &'a K> + 'q
    where
        'a: 'q,
    {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate over the values in this view.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &'a V> + 'q
    where
        'a: 'q,
    {
        self.iter().map(|(_, v)| v)
    }

    /// Count the entries in this view.
    ///
    /// This visits every match, and is `O(log n + k)` for `k` matches.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if this view contains no entries.
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    /// Returns true if the tree holds an entry equivalent to `key` that is
    /// also selected by this view's query.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Return the value of the first entry equivalent to `key`, if it is
    /// selected by this view's query.
    pub fn get(&self, key: &K) -> Option<&'a V> {
        if !self.query.matches(&self.tree.comparator, key) {
            return None;
        }
        self.tree.get(key)
    }

    /// Return the first entry in view order.
    pub fn first(&self) -> Option<(&'a K, &'a V)> {
        self.entry(self.tree.find_extreme(&self.query, self.direction))
    }

    /// Return the last entry in view order.
    pub fn last(&self) -> Option<(&'a K, &'a V)> {
        self.entry(
            self.tree
                .find_extreme(&self.query, self.direction.reverse()),
        )
    }

    /// Return the nearest entry strictly after `key` in view order.
    pub fn higher(&self, key: &K) -> Option<(&'a K, &'a V)> {
        self.entry(self.seek(key, false))
    }

    /// Return the nearest entry at or after `key` in view order.
    pub fn ceiling(&self, key: &K) -> Option<(&'a K, &'a V)> {
        self.entry(self.seek(key, true))
    }

    /// Return the nearest entry strictly before `key` in view order.
    pub fn lower(&self, key: &K) -> Option<(&'a K, &'a V)> {
        self.entry(self.rev().seek(key, false))
    }

    /// Return the nearest entry at or before `key` in view order.
    pub fn floor(&self, key: &K) -> Option<(&'a K, &'a V)> {
        self.entry(self.rev().seek(key, true))
    }

    /// Return the first match at (when `inclusive`) or after `key` in view
    /// order.
    fn seek(&self, key: &K, inclusive: bool) -> Option<NodeId> {
        let n = match self.direction {
            Direction::Ascending => self.tree.find_ceiling(key, inclusive),
            Direction::Descending => self.tree.find_floor(key, inclusive),
        }?;

        if self.query.matches(&self.tree.comparator, &self.tree.nodes[n].key) {
            return Some(n);
        }
        self.tree.find_next(&self.query, n, self.direction)
    }

    fn entry(&self, n: Option<NodeId>) -> Option<(&'a K, &'a V)> {
        n.map(|n| self.tree.entry_ref(n))
    }
}

impl<'a, 'q, K, V, C> IntoIterator for View<'a, 'q, K, V, C>
where
    C: IntervalComparator<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, 'q, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A projection of the entries of an [`IntervalTree`] selected by a [`Query`],
/// through which those entries can be removed.
///
/// Removal only ever affects entries selected by the query: [`clear()`] on a
/// view of the intervals intersecting `[2, 4)` leaves every other entry in
/// place.
///
/// ```
/// use interrb::{IntervalTree, Query};
///
/// let mut t = (0..10).map(|v| (v..v + 1, v)).collect::<IntervalTree<_, _>>();
///
/// let q = 2..5;
/// t.query_mut(Query::Intersecting(&q)).clear();
///
/// assert_eq!(t.len(), 7);
/// assert!(!t.contains_intersection(&q));
/// ```
///
/// [`clear()`]: ViewMut::clear
pub struct ViewMut<'a, 'q, K, V, C> {
    tree: &'a mut IntervalTree<K, V, C>,
    query: Query<'q, K>,
    direction: Direction,
}

impl<K, V, C> Debug for ViewMut<'_, '_, K, V, C>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewMut")
            .field("query", &self.query)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<'a, 'q, K, V, C> ViewMut<'a, 'q, K, V, C>
where
    C: IntervalComparator<K>,
{
    pub(crate) fn new(tree: &'a mut IntervalTree<K, V, C>, query: Query<'q, K>) -> Self {
        Self {
            tree,
            query,
            direction: Direction::Ascending,
        }
    }

    /// Return this view with its direction reversed.
    pub fn rev(self) -> Self {
        Self {
            direction: self.direction.reverse(),
            ..self
        }
    }

    /// Borrow a read-only [`View`] of the same entries, in the same direction.
    pub fn as_view(&self) -> View<'_, 'q, K, V, C> {
        View {
            tree: self.tree,
            query: self.query,
            direction: self.direction,
        }
    }

    /// Iterate over the `(interval, value)` tuples in this view.
    pub fn iter(&self) -> Iter<'_, 'q, K, V, C> {
        self.as_view().iter()
    }

    /// Count the entries in this view.
    pub fn len(&self) -> usize {
        self.as_view().len()
    }

    /// Returns true if this view contains no entries.
    pub fn is_empty(&self) -> bool {
        self.as_view().is_empty()
    }

    /// Returns true if the tree holds an entry equivalent to `key` that is
    /// also selected by this view's query.
    pub fn contains_key(&self, key: &K) -> bool {
        self.as_view().contains_key(key)
    }

    /// Return the first entry in view order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.as_view().first()
    }

    /// Return the last entry in view order.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.as_view().last()
    }

    /// Remove the first entry equivalent to `key`, if it is selected by this
    /// view's query.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.query.matches(&self.tree.comparator, key) {
            return None;
        }
        self.tree.remove(key)
    }

    /// Remove and return the first entry in view order.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let n = self.tree.find_extreme(&self.query, self.direction)?;
        Some(self.tree.remove_node(n))
    }

    /// Remove and return the last entry in view order.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let n = self
            .tree
            .find_extreme(&self.query, self.direction.reverse())?;
        Some(self.tree.remove_node(n))
    }

    /// Retain only the entries in this view for which `f` returns true,
    /// visiting them in view order.
    ///
    /// Entries outside the view are untouched.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut ptr = self.tree.find_extreme(&self.query, self.direction);
        while let Some(n) = ptr {
            // Removing n does not invalidate the handle of its successor.
            ptr = self.tree.find_next(&self.query, n, self.direction);

            let node = &mut self.tree.nodes[n];
            if !f(&node.key, &mut node.value) {
                self.tree.remove_node(n);
            }
        }
    }

    /// Remove every entry in this view, leaving all other entries in place.
    pub fn clear(&mut self) {
        let mut removed = 0_usize;
        let mut ptr = self.tree.find_extreme(&self.query, self.direction);
        while let Some(n) = ptr {
            // Removing n does not invalidate the handle of its successor.
            ptr = self.tree.find_next(&self.query, n, self.direction);
            self.tree.remove_node(n);
            removed += 1;
        }

        trace!(removed, remaining = self.tree.len(), "cleared view");
    }

    /// Return a detached [`Cursor`] over the entries in this view, in view
    /// order.
    pub fn cursor(&self) -> Cursor<'q, K> {
        Cursor::new(self.query, self.direction, self.tree.mod_count)
    }
}
