use tracing::debug;

use crate::{
    comparator::IntervalComparator,
    error::CursorError,
    node::NodeId,
    query::{Direction, Query},
    tree::IntervalTree,
};

/// A detached, fail-fast cursor over the entries selected by a [`Query`].
///
/// Unlike [`Iter`](crate::Iter), a [`Cursor`] does not borrow the tree it
/// walks: the tree is passed to each call instead. This allows entries to be
/// removed mid-walk with [`Cursor::remove()`].
///
/// The cursor records the tree's modification count when it is created. Any
/// structural change made to the tree other than through [`Cursor::remove()`]
/// invalidates the cursor, and every subsequent call returns
/// [`CursorError::ConcurrentModification`].
///
/// A cursor must only be used with the tree that created it.
///
/// ```
/// use interrb::{IntervalTree, Query};
///
/// let mut t = IntervalTree::default();
/// t.insert(1..2, "a");
/// t.insert(1..2, "b");
/// t.insert(5..6, "c");
///
/// let q = 0..3;
/// let mut cursor = t.cursor(Query::Intersecting(&q));
/// while let Some((_, v)) = cursor.next(&t)? {
///     if *v == "a" {
///         cursor.remove(&mut t)?;
///     }
/// }
///
/// assert_eq!(t.len(), 2);
/// # Ok::<(), interrb::CursorError>(())
/// ```
#[derive(Debug)]
pub struct Cursor<'q, K> {
    query: Query<'q, K>,
    direction: Direction,

    /// The tree modification count this cursor is valid for.
    expected_mod_count: u64,

    started: bool,
    /// The entry to yield from the next call to `next()`.
    next: Option<NodeId>,
    /// The entry last yielded, if it has not been removed.
    current: Option<NodeId>,
}

impl<'q, K> Cursor<'q, K> {
    pub(crate) fn new(query: Query<'q, K>, direction: Direction, mod_count: u64) -> Self {
        Self {
            query,
            direction,
            expected_mod_count: mod_count,
            started: false,
            next: None,
            current: None,
        }
    }

    /// Reverse the direction of a cursor that has not yet been advanced.
    ///
    /// Once [`Cursor::next()`] has been called the walk direction is fixed,
    /// and this returns the cursor unchanged.
    pub fn rev(mut self) -> Self {
        if !self.started {
            self.direction = self.direction.reverse();
        }
        self
    }

    /// Return the direction this cursor walks in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance the cursor, returning the next matching entry, or [`None`] when
    /// the matches are exhausted.
    pub fn next<'t, V, C>(
        &mut self,
        tree: &'t IntervalTree<K, V, C>,
    ) -> Result<Option<(&'t K, &'t V)>, CursorError>
    where
        C: IntervalComparator<K>,
    {
        self.check(tree)?;

        let n = if self.started {
            self.next
        } else {
            self.started = true;
            tree.find_extreme(&self.query, self.direction)
        };

        self.current = n;
        self.next = n.and_then(|n| tree.find_next(&self.query, n, self.direction));

        Ok(n.map(|n| tree.entry_ref(n)))
    }

    /// Remove the entry last returned by [`Cursor::next()`] from `tree`,
    /// returning it.
    ///
    /// The cursor remains valid, and continues with the entry that followed
    /// the removed one.
    pub fn remove<V, C>(&mut self, tree: &mut IntervalTree<K, V, C>) -> Result<(K, V), CursorError>
    where
        C: IntervalComparator<K>,
    {
        self.check(tree)?;

        let n = self.current.take().ok_or(CursorError::IllegalState)?;
        let entry = tree.remove_node(n);

        // Removal relinks nodes without invalidating the handles of the
        // survivors, so the precomputed successor remains correct.
        self.expected_mod_count = tree.mod_count;

        Ok(entry)
    }

    fn check<V, C>(&self, tree: &IntervalTree<K, V, C>) -> Result<(), CursorError> {
        if tree.mod_count != self.expected_mod_count {
            debug!(
                expected = self.expected_mod_count,
                actual = tree.mod_count,
                "cursor used after concurrent tree modification"
            );
            return Err(CursorError::ConcurrentModification);
        }
        Ok(())
    }
}
