use std::{cmp::Ordering, fmt::Debug};

use tracing::debug;

use crate::{
    comparator::IntervalComparator,
    error::InvariantError,
    node::{Color, NodeId},
    tree::IntervalTree,
};

impl<K, V, C> IntervalTree<K, V, C>
where
    K: Debug,
    C: IntervalComparator<K>,
{
    /// Walk the whole tree, checking every structural invariant.
    ///
    /// This is an `O(n log n)` operation intended for tests and debugging: a
    /// tree that is only modified through its public API always validates.
    ///
    /// Checked invariants:
    ///
    ///   * The root is black, and every child links back to its parent.
    ///   * No red node has a red child.
    ///   * Every root-to-leaf path crosses the same number of black nodes.
    ///   * An in-order walk yields keys in non-decreasing order.
    ///   * Every node's cached `max_stop` is a node in its own subtree, with
    ///     an upper bound no smaller than any other in that subtree.
    ///   * Every node in the arena is reachable from the root.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.validate_inner().inspect_err(|e| debug!(error = %e, "invalid tree"))
    }

    fn validate_inner(&self) -> Result<(), InvariantError> {
        let Some(root) = self.root else {
            return match self.nodes.len() {
                0 => Ok(()),
                len => Err(InvariantError::Len { reachable: 0, len }),
            };
        };

        if self.nodes[root].is_red() {
            return Err(InvariantError::RedRoot {
                key: self.render(root),
            });
        }
        if self.nodes[root].parent.is_some() {
            return Err(InvariantError::ParentLink {
                key: self.render(root),
            });
        }

        let mut reachable = 0;
        self.check_subtree(root, &mut reachable)?;
        if reachable != self.nodes.len() {
            return Err(InvariantError::Len {
                reachable,
                len: self.nodes.len(),
            });
        }

        let mut prev: Option<NodeId> = None;
        for n in self.in_order() {
            if let Some(p) = prev {
                let ord = self
                    .comparator
                    .compare_order(&self.nodes[p].key, &self.nodes[n].key);
                if ord == Ordering::Greater {
                    return Err(InvariantError::Order {
                        key: self.render(n),
                        prev: self.render(p),
                    });
                }
            }
            prev = Some(n);
        }

        Ok(())
    }

    /// Check the subtree rooted at `n`, returning its black height.
    fn check_subtree(&self, n: NodeId, reachable: &mut usize) -> Result<usize, InvariantError> {
        *reachable += 1;
        let node = &self.nodes[n];

        let mut heights = [0; 2];
        for (i, child) in [node.left, node.right].into_iter().enumerate() {
            let Some(child) = child else {
                continue;
            };
            if self.nodes[child].parent != Some(n) {
                return Err(InvariantError::ParentLink {
                    key: self.render(n),
                });
            }
            if node.is_red() && self.nodes[child].is_red() {
                return Err(InvariantError::RedRed {
                    key: self.render(n),
                });
            }
            heights[i] = self.check_subtree(child, reachable)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantError::BlackHeight {
                key: self.render(n),
                left,
                right,
            });
        }

        self.check_max_stop(n)?;

        Ok(left + usize::from(node.color == Color::Black))
    }

    fn check_max_stop(&self, n: NodeId) -> Result<(), InvariantError> {
        let node = &self.nodes[n];
        let got = node.max_stop;

        // The holder must be n, or a descendant of n.
        let mut ptr = Some(got);
        while ptr.is_some_and(|p| p != n) {
            ptr = ptr.and_then(|p| self.nodes.get(p)).and_then(|p| p.parent);
        }
        if ptr.is_none() {
            return Err(InvariantError::MaxStopOutsideSubtree {
                key: self.render(n),
                got: format!("{:?}", self.nodes.get(got).map(|v| &v.key)),
            });
        }

        // The children are checked first, so their cached values are correct.
        let mut want = n;
        for child in [node.left, node.right].into_iter().flatten() {
            let candidate = self.nodes[child].max_stop;
            if self
                .comparator
                .compare_maxes(&self.nodes[candidate].key, &self.nodes[want].key)
                == Ordering::Greater
            {
                want = candidate;
            }
        }

        if self
            .comparator
            .compare_maxes(&self.nodes[got].key, &self.nodes[want].key)
            != Ordering::Equal
        {
            return Err(InvariantError::MaxStop {
                key: self.render(n),
                got: self.render(got),
                want: self.render(want),
            });
        }

        Ok(())
    }

    fn in_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![];
        let mut ptr = self.root;

        std::iter::from_fn(move || {
            while let Some(n) = ptr {
                stack.push(n);
                ptr = self.nodes[n].left;
            }
            let n = stack.pop()?;
            ptr = self.nodes[n].right;
            Some(n)
        })
    }

    fn render(&self, n: NodeId) -> String {
        format!("{:?}", self.nodes[n].key)
    }
}
