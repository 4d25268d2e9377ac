//! Red-black insertion and deletion, and the upkeep of the per-node
//! [`max_stop`](Node::max_stop) augmentation through every structural change.

use std::cmp::Ordering;

use crate::{
    comparator::IntervalComparator,
    node::{Color, Node, NodeId, Side},
    tree::IntervalTree,
};

impl<K, V, C> IntervalTree<K, V, C>
where
    C: IntervalComparator<K>,
{
    /// Link a new node holding `key` and `value` into the tree and restore the
    /// red-black invariants.
    ///
    /// Keys that compare equal to an existing key are placed after it, so runs
    /// of equivalent keys are stored in insertion order.
    pub(crate) fn insert_node(&mut self, key: K, value: V) -> NodeId {
        let id = self
            .nodes
            .insert_with_key(|id| Node::new(id, key, value));

        // Descend to the insertion point, raising the max_stop of every
        // ancestor the new interval now dominates.
        let mut parent = None;
        let mut side = Side::Left;
        let mut ptr = self.root;
        while let Some(n) = ptr {
            let stop = self.nodes[n].max_stop;
            if self
                .comparator
                .compare_maxes(&self.nodes[id].key, &self.nodes[stop].key)
                == Ordering::Greater
            {
                self.nodes[n].max_stop = id;
            }

            side = match self
                .comparator
                .compare_order(&self.nodes[id].key, &self.nodes[n].key)
            {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };

            parent = Some(n);
            ptr = self.nodes[n].child(side);
        }

        self.nodes[id].parent = parent;
        match parent {
            Some(p) => *self.nodes[p].child_mut(side) = Some(id),
            None => self.root = Some(id),
        }

        self.insert_fixup(id);
        self.mod_count += 1;

        id
    }

    /// Unlink and free the node `z`, returning its key and value.
    pub(crate) fn remove_node(&mut self, z: NodeId) -> (K, V) {
        // A node with two children first trades places with its in-order
        // predecessor, leaving it with at most one (left) child.
        if let (Some(left), Some(_)) = (self.nodes[z].left, self.nodes[z].right) {
            let pred = self.subtree_last(left);
            self.swap_with_predecessor(z, pred);
        }

        let child = self.nodes[z].left.or(self.nodes[z].right);
        let parent = self.nodes[z].parent;

        self.replace_child(parent, z, child);
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }

        // Every ancestor of the unlinked position may have cached z (or, after
        // a swap, a stale view of the predecessor) as its max_stop.
        let mut ptr = parent;
        while let Some(n) = ptr {
            self.update_max_stop(n);
            ptr = self.nodes[n].parent;
        }

        if self.nodes[z].color == Color::Black {
            self.remove_fixup(child, parent);
        }

        self.mod_count += 1;

        let node = self.nodes.remove(z).unwrap();
        (node.key, node.value)
    }

    /// Restore the red-black invariants after linking the red node `z`.
    fn insert_fixup(&mut self, mut z: NodeId) {
        while let Some(mut p) = self.nodes[z].parent.filter(|&p| self.nodes[p].is_red()) {
            // A red node is never the root, so the grandparent exists.
            let g = self.nodes[p].parent.unwrap();
            let side = self.side_of(g, p);
            let uncle = self.nodes[g].child(side.opposite());

            if self.is_red(uncle) {
                // Red uncle: push the blackness down from the grandparent and
                // continue from there.
                self.nodes[p].color = Color::Black;
                self.nodes[uncle.unwrap()].color = Color::Black;
                self.nodes[g].color = Color::Red;
                z = g;
                continue;
            }

            // Black uncle: straighten a zig-zag, then rotate the grandparent.
            if self.nodes[p].child(side.opposite()) == Some(z) {
                z = p;
                self.rotate(z, side);
                p = self.nodes[z].parent.unwrap();
            }

            self.nodes[p].color = Color::Black;
            self.nodes[g].color = Color::Red;
            self.rotate(g, side.opposite());
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Restore the red-black invariants after removing a black node whose
    /// place was taken by `x` (possibly empty) under `parent`.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            // x is not the root, so it has a parent.
            let p = parent.unwrap();
            let side = if self.nodes[p].left == x {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();

            // x carries a double black, so its sibling subtree has a black
            // height of at least 1 and the sibling exists.
            let mut w = self.nodes[p].child(far).unwrap();

            if self.nodes[w].is_red() {
                self.nodes[w].color = Color::Black;
                self.nodes[p].color = Color::Red;
                self.rotate(p, side);
                w = self.nodes[p].child(far).unwrap();
            }

            let near_nephew = self.nodes[w].child(side);
            let far_nephew = self.nodes[w].child(far);

            if !self.is_red(near_nephew) && !self.is_red(far_nephew) {
                self.nodes[w].color = Color::Red;
                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            }

            if !self.is_red(far_nephew) {
                // near_nephew is red.
                self.nodes[near_nephew.unwrap()].color = Color::Black;
                self.nodes[w].color = Color::Red;
                self.rotate(w, far);
                w = self.nodes[p].child(far).unwrap();
            }

            self.nodes[w].color = self.nodes[p].color;
            self.nodes[p].color = Color::Black;
            if let Some(n) = self.nodes[w].child(far) {
                self.nodes[n].color = Color::Black;
            }
            self.rotate(p, side);

            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }

    /// Rotate the subtree rooted at `x` so that `x` moves down to `side`, and
    /// its child on the opposite side takes its place.
    ///
    /// A left rotation (`side == Side::Left`):
    ///
    /// ```text
    ///
    ///      x
    ///     / \                               y
    ///    1   y         Rotate Left        /   \
    ///       / \      --------------->    x     3
    ///      2   3                        / \
    ///                                  1   2
    /// ```
    ///
    /// `y` spans exactly the intervals `x` spanned before the rotation, so it
    /// inherits the max_stop of `x`, which is then recomputed from its new
    /// children.
    ///
    /// # Panics
    ///
    /// Panics if `x` has no child on the opposite side (cannot be rotated).
    pub(crate) fn rotate(&mut self, x: NodeId, side: Side) {
        let far = side.opposite();
        let y = self.nodes[x].child(far).unwrap();

        let inner = self.nodes[y].child(side);
        *self.nodes[x].child_mut(far) = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }

        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        *self.nodes[y].child_mut(side) = Some(x);
        self.nodes[x].parent = Some(y);

        self.nodes[y].max_stop = self.nodes[x].max_stop;
        self.update_max_stop(x);
    }

    /// Exchange the tree positions (links and colours) of `z` and its in-order
    /// predecessor `y`, the right-most node of the left subtree of `z`.
    ///
    /// ```text
    ///          z                      y
    ///         / \                    / \
    ///        a   r                  a   r
    ///         \         ---->        \
    ///          y                      z
    ///         /                      /
    ///        b                      b
    /// ```
    ///
    /// Afterwards `z` has no right child. The max_stop of both nodes (and of
    /// the nodes between them) is left stale for the caller to recompute.
    fn swap_with_predecessor(&mut self, z: NodeId, y: NodeId) {
        debug_assert!(self.nodes[y].right.is_none());

        let z_parent = self.nodes[z].parent;
        let z_left = self.nodes[z].left;
        let z_right = self.nodes[z].right;
        let y_parent = self.nodes[y].parent;
        let y_left = self.nodes[y].left;

        // y takes the position of z.
        self.replace_child(z_parent, z, Some(y));
        self.nodes[y].parent = z_parent;

        self.nodes[y].right = z_right;
        if let Some(r) = z_right {
            self.nodes[r].parent = Some(y);
        }

        if y_parent == Some(z) {
            // y was the direct left child of z.
            self.nodes[y].left = Some(z);
            self.nodes[z].parent = Some(y);
        } else {
            self.nodes[y].left = z_left;
            if let Some(l) = z_left {
                self.nodes[l].parent = Some(y);
            }

            // y was the right-most node of the subtree, so it was a right
            // child.
            let yp = y_parent.unwrap();
            self.nodes[yp].right = Some(z);
            self.nodes[z].parent = Some(yp);
        }

        // z takes the position of y.
        self.nodes[z].left = y_left;
        if let Some(l) = y_left {
            self.nodes[l].parent = Some(z);
        }
        self.nodes[z].right = None;

        let z_color = self.nodes[z].color;
        self.nodes[z].color = self.nodes[y].color;
        self.nodes[y].color = z_color;
    }

    /// Recompute the max_stop of `n` from itself and its children's cached
    /// values.
    ///
    /// Ties favour `n`, then the left child.
    pub(crate) fn update_max_stop(&mut self, n: NodeId) {
        let mut best = n;
        for child in [self.nodes[n].left, self.nodes[n].right]
            .into_iter()
            .flatten()
        {
            let candidate = self.nodes[child].max_stop;
            if self
                .comparator
                .compare_maxes(&self.nodes[candidate].key, &self.nodes[best].key)
                == Ordering::Greater
            {
                best = candidate;
            }
        }

        self.nodes[n].max_stop = best;
    }

    /// Point the link in `parent` (or the root) that referenced `old` at
    /// `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => {
                debug_assert_eq!(self.nodes[p].right, Some(old));
                self.nodes[p].right = new;
            }
        }
    }

    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self.nodes[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Absent (leaf) links are black.
    fn is_red(&self, n: Option<NodeId>) -> bool {
        n.map(|v| self.nodes[v].is_red()).unwrap_or_default()
    }
}
