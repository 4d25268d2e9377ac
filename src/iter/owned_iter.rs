use slotmap::SlotMap;

use crate::{
    node::{Node, NodeId},
    tree::IntervalTree,
};

/// An iterator of owned `(interval, value)` tuples as the underlying tree
/// `into_iter()` impl, yielding entries in ascending order.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new<C>(tree: IntervalTree<K, V, C>) -> Self {
        let mut order = Vec::with_capacity(tree.nodes.len());
        let mut stack = vec![];

        // An in-order walk: descend down the left side of each subtree, then
        // visit the right hand child of every popped node.
        push_subtree(&tree.nodes, &mut stack, tree.root);
        while let Some(n) = stack.pop() {
            order.push(n);
            push_subtree(&tree.nodes, &mut stack, tree.nodes[n].right);
        }

        Self {
            nodes: tree.nodes,
            order: order.into_iter(),
        }
    }

    fn take(&mut self, n: NodeId) -> (K, V) {
        // Every ID in the walk order is yielded (and freed) at most once.
        let node = self.nodes.remove(n).unwrap();
        (node.key, node.value)
    }
}

fn push_subtree<K, V>(
    nodes: &SlotMap<NodeId, Node<K, V>>,
    stack: &mut Vec<NodeId>,
    subtree_root: Option<NodeId>,
) {
    let mut ptr = subtree_root;

    while let Some(v) = ptr {
        stack.push(v);
        ptr = nodes[v].left;
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.order.next()?;
        Some(self.take(n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let n = self.order.next_back()?;
        Some(self.take(n))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
