use std::{cmp::Ordering, fmt::Debug};

use slotmap::SlotMap;

use crate::{
    comparator::{HalfOpen, IntervalComparator},
    cursor::Cursor,
    iter::{IntoIter, Iter},
    node::{Node, NodeId},
    query::{Direction, Query},
    view::{View, ViewMut},
};

/// An [`IntervalTree`] stores `(interval, value)` tuples, enabling efficient
/// lookup of the stored intervals that are equivalent to, intersect, contain
/// or are contained by a query interval.
///
/// Keys of any type `K` may be stored: all ordering decisions are delegated to
/// an [`IntervalComparator`] chosen at construction. The default [`HalfOpen`]
/// comparator handles [`Range`] and `[start, end]` array keys as half-open
/// intervals.
///
/// # Duplicates
///
/// Unlike a map, the tree never replaces an entry: every [`insert()`] adds a
/// new entry, even when an equivalent interval is already stored. Equivalent
/// intervals are yielded in insertion order.
///
/// # Balancing
///
/// The tree is a red-black tree, augmented with a per-node reference to the
/// node holding the greatest upper bound in its subtree. The augmentation lets
/// searches skip subtrees that cannot contain a match, giving `O(log n + k)`
/// lookups for `k` results.
///
/// # Key Stability
///
/// Keys are never handed out mutably. If `K` has interior mutability, changing
/// the bounds of a stored key corrupts the tree order and the results of all
/// subsequent operations are unspecified.
///
/// [`Range`]: std::ops::Range
/// [`insert()`]: IntervalTree::insert
#[derive(Clone)]
pub struct IntervalTree<K, V, C = HalfOpen> {
    pub(crate) nodes: SlotMap<NodeId, Node<K, V>>,
    pub(crate) root: Option<NodeId>,
    pub(crate) comparator: C,

    /// Incremented by every structural modification, allowing detached
    /// [`Cursor`] instances to detect use after the tree has changed.
    pub(crate) mod_count: u64,
}

// Only implemented for the default comparator so that `default()` needs no
// type annotations. Trees using other comparators are built with `new()`.
impl<K, V> Default for IntervalTree<K, V, HalfOpen> {
    fn default() -> Self {
        Self::new(HalfOpen)
    }
}

impl<K, V, C> Debug for IntervalTree<K, V, C>
where
    K: Debug,
    V: Debug,
    C: IntervalComparator<K>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> IntervalTree<K, V, C> {
    /// Initialise an empty tree ordered by `comparator`.
    pub fn new(comparator: C) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            comparator,
            mod_count: 0,
        }
    }

    /// Return the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove all entries from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.mod_count += 1;
    }

    /// Return the comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) fn entry_ref(&self, n: NodeId) -> (&K, &V) {
        let node = &self.nodes[n];
        (&node.key, &node.value)
    }
}

impl<K, V, C> IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    /// Initialise a tree ordered by `comparator`, inserting each of `entries`
    /// in turn.
    pub fn from_entries<I>(comparator: C, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut this = Self::new(comparator);
        this.extend(entries);
        this
    }

    /// Insert an `(interval, value)` tuple into the tree.
    ///
    /// A new entry is always created, so this always returns [`None`]: no
    /// existing value is ever replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_node(key, value);
        None
    }

    /// Return a reference to the value of the first entry with bounds
    /// equivalent to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.first_value(Query::Equivalent(key))
    }

    /// Return a mutable reference to the value of the first entry with bounds
    /// equivalent to `key`, if any.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let n = self.find_extreme(&Query::Equivalent(key), Direction::Ascending)?;
        Some(&mut self.nodes[n].value)
    }

    /// Return the stored key and value of the first entry with bounds
    /// equivalent to `key`, if any.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.first(Query::Equivalent(key))
    }

    /// Return the value of the first (lowest ordered) entry that intersects
    /// `key`.
    pub fn get_intersection(&self, key: &K) -> Option<&V> {
        self.first_value(Query::Intersecting(key))
    }

    /// Return the value of the first (lowest ordered) entry that contains
    /// `key`.
    pub fn get_superset(&self, key: &K) -> Option<&V> {
        self.first_value(Query::Superset(key))
    }

    /// Return the value of the first (lowest ordered) entry contained by `key`.
    pub fn get_subset(&self, key: &K) -> Option<&V> {
        self.first_value(Query::Subset(key))
    }

    /// Returns true if the tree holds an entry with bounds equivalent to `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if any stored interval intersects `key`.
    pub fn contains_intersection(&self, key: &K) -> bool {
        self.get_intersection(key).is_some()
    }

    /// Returns true if any single stored interval contains `key`.
    pub fn contains_superset(&self, key: &K) -> bool {
        self.get_superset(key).is_some()
    }

    /// Returns true if any stored interval is contained by `key`.
    pub fn contains_subset(&self, key: &K) -> bool {
        self.get_subset(key).is_some()
    }

    /// Returns true if the union of all stored intervals covers `key`.
    ///
    /// Unlike [`contains_superset()`], the covering may be assembled from
    /// several adjoining or overlapping intervals:
    ///
    /// ```
    /// use interrb::IntervalTree;
    ///
    /// let mut t = IntervalTree::default();
    /// t.insert(0..4, "a");
    /// t.insert(4..10, "b");
    ///
    /// assert!(!t.contains_superset(&(2..8)));
    /// assert!(t.covers(&(2..8)));
    /// assert!(!t.covers(&(2..12)));
    /// ```
    ///
    /// [`contains_superset()`]: IntervalTree::contains_superset
    pub fn covers(&self, key: &K) -> bool {
        self.union_covers(key)
    }

    /// Remove the first entry with bounds equivalent to `key`, returning its
    /// value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove the first entry with bounds equivalent to `key`, returning the
    /// stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.remove_first(Query::Equivalent(key))
    }

    /// Remove the first (lowest ordered) entry that intersects `key`.
    pub fn remove_intersection(&mut self, key: &K) -> Option<V> {
        self.remove_first(Query::Intersecting(key)).map(|(_, v)| v)
    }

    /// Remove the first (lowest ordered) entry that contains `key`.
    pub fn remove_superset(&mut self, key: &K) -> Option<V> {
        self.remove_first(Query::Superset(key)).map(|(_, v)| v)
    }

    /// Remove the first (lowest ordered) entry contained by `key`.
    pub fn remove_subset(&mut self, key: &K) -> Option<V> {
        self.remove_first(Query::Subset(key)).map(|(_, v)| v)
    }

    /// Remove and return the lowest ordered entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.remove_first(Query::All)
    }

    /// Remove and return the highest ordered entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let n = self.find_extreme(&Query::All, Direction::Descending)?;
        Some(self.remove_node(n))
    }

    /// Retain only the entries for which `f` returns true, visiting them in
    /// ascending order.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.query_mut(Query::All).retain(f)
    }

    /// Return the lowest ordered entry (the lowest lower bound, tie-broken by
    /// the lowest upper bound).
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first(Query::All)
    }

    /// Return the highest ordered entry.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.query(Query::All).last()
    }

    /// Return an entry with the lowest upper bound.
    ///
    /// This is a pruned scan that stops once stored intervals begin after the
    /// lowest upper bound seen; its worst case is linear. When several entries
    /// share the lowest upper bound, which one is returned is unspecified.
    pub fn first_by_max(&self) -> Option<(&K, &V)> {
        self.find_first_by_max().map(|n| self.entry_ref(n))
    }

    /// Return an entry with the greatest upper bound in constant time.
    ///
    /// When several entries share the greatest upper bound, which one is
    /// returned is unspecified and may change as the tree is modified.
    pub fn last_by_max(&self) -> Option<(&K, &V)> {
        self.root.map(|n| self.entry_ref(self.nodes[n].max_stop))
    }

    /// Return the greatest key strictly ordered before `key`.
    pub fn lower_key(&self, key: &K) -> Option<&K> {
        self.query(Query::All).lower(key).map(|(k, _)| k)
    }

    /// Return the greatest key ordered at or before `key`.
    ///
    /// Of several keys equivalent to `key`, the last inserted is returned.
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.query(Query::All).floor(key).map(|(k, _)| k)
    }

    /// Return the least key ordered at or after `key`.
    ///
    /// Of several keys equivalent to `key`, the first inserted is returned.
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.query(Query::All).ceiling(key).map(|(k, _)| k)
    }

    /// Return the least key strictly ordered after `key`.
    pub fn higher_key(&self, key: &K) -> Option<&K> {
        self.query(Query::All).higher(key).map(|(k, _)| k)
    }

    /// Iterate over all `(interval, value)` tuples, ordered by lower bound and
    /// tie-broken by upper bound, with equivalent intervals in insertion order.
    pub fn iter(&self) -> Iter<'_, '_, K, V, C> {
        Iter::new(self, Query::All, Direction::Ascending)
    }

    /// Iterate over all keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate over all values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Iterate over entries with bounds equivalent to `key`, in insertion
    /// order.
    pub fn iter_equivalent<'a>(&'a self, key: &'a K) -> Iter<'a, 'a, K, V, C> {
        Iter::new(self, Query::Equivalent(key), Direction::Ascending)
    }

    /// Iterate over entries intersecting `key` in ascending order.
    ///
    /// The diagram below shows two intervals where `X` intersects the query
    /// range `Y`, and `Y` intersects `X`:
    ///
    /// ```text
    ///                           X
    ///                   ■■■■■■■■■■■■■■■■■
    ///
    ///                               ■■■■■■■■■■■■■■■■■
    ///                                       Y
    /// ```
    pub fn iter_intersecting<'a>(&'a self, key: &'a K) -> Iter<'a, 'a, K, V, C> {
        Iter::new(self, Query::Intersecting(key), Direction::Ascending)
    }

    /// Iterate over entries that contain `key` in ascending order.
    ///
    /// ```text
    ///                           X
    ///                   ■■■■■■■■■■■■■■■■■■■■■■■
    ///
    ///                        ■■■■■■■■■■■
    ///                             Y
    /// ```
    pub fn iter_superset<'a>(&'a self, key: &'a K) -> Iter<'a, 'a, K, V, C> {
        Iter::new(self, Query::Superset(key), Direction::Ascending)
    }

    /// Iterate over entries contained by `key` in ascending order.
    ///
    /// ```text
    ///                           X
    ///                        ■■■■■■■■■■■
    ///
    ///                   ■■■■■■■■■■■■■■■■■■■■■■■
    ///                             Y
    /// ```
    pub fn iter_subset<'a>(&'a self, key: &'a K) -> Iter<'a, 'a, K, V, C> {
        Iter::new(self, Query::Subset(key), Direction::Ascending)
    }

    /// Return a read-only [`View`] of the entries selected by `query`.
    pub fn query<'q>(&self, query: Query<'q, K>) -> View<'_, 'q, K, V, C> {
        View::new(self, query)
    }

    /// Return a [`ViewMut`] of the entries selected by `query`, through which
    /// they can be removed.
    pub fn query_mut<'q>(&mut self, query: Query<'q, K>) -> ViewMut<'_, 'q, K, V, C> {
        ViewMut::new(self, query)
    }

    /// Return a detached [`Cursor`] over the entries selected by `query`.
    ///
    /// The cursor does not borrow the tree, and fails fast if the tree is
    /// modified other than through the cursor itself.
    pub fn cursor<'q>(&self, query: Query<'q, K>) -> Cursor<'q, K> {
        Cursor::new(query, Direction::Ascending, self.mod_count)
    }

    fn first<'q>(&self, query: Query<'q, K>) -> Option<(&K, &V)> {
        self.find_extreme(&query, Direction::Ascending)
            .map(|n| self.entry_ref(n))
    }

    fn first_value<'q>(&self, query: Query<'q, K>) -> Option<&V> {
        self.first(query).map(|(_, v)| v)
    }

    fn remove_first<'q>(&mut self, query: Query<'q, K>) -> Option<(K, V)> {
        let n = self.find_extreme(&query, Direction::Ascending)?;
        Some(self.remove_node(n))
    }

    /// Return the last node ordered strictly before (or, when `inclusive`, at
    /// or before) `key`.
    pub(crate) fn find_floor(&self, key: &K, inclusive: bool) -> Option<NodeId> {
        let mut best = None;
        let mut ptr = self.root;
        while let Some(n) = ptr {
            let ord = self.comparator.compare_order(&self.nodes[n].key, key);
            if ord == Ordering::Less || (inclusive && ord == Ordering::Equal) {
                best = Some(n);
                ptr = self.nodes[n].right;
            } else {
                ptr = self.nodes[n].left;
            }
        }
        best
    }

    /// Return the first node ordered strictly after (or, when `inclusive`, at
    /// or after) `key`.
    pub(crate) fn find_ceiling(&self, key: &K, inclusive: bool) -> Option<NodeId> {
        let mut best = None;
        let mut ptr = self.root;
        while let Some(n) = ptr {
            let ord = self.comparator.compare_order(&self.nodes[n].key, key);
            if ord == Ordering::Greater || (inclusive && ord == Ordering::Equal) {
                best = Some(n);
                ptr = self.nodes[n].left;
            } else {
                ptr = self.nodes[n].right;
            }
        }
        best
    }
}

impl<K, V, C> FromIterator<(K, V)> for IntervalTree<K, V, C>
where
    C: IntervalComparator<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(C::default(), iter)
    }
}

impl<K, V, C> Extend<(K, V)> for IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert_node(k, v);
        }
    }
}

impl<K, V, C> IntoIterator for IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, K, V, C> IntoIterator for &'a IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, 'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
