slotmap::new_key_type! {
    /// A stable handle to a [`Node`] in the tree arena.
    ///
    /// Handles survive rotations and the position swap performed when
    /// deleting a node with two children: a node is relinked, never moved.
    pub(crate) struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// The side of a parent a child node is linked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,

    pub(crate) color: Color,

    /// Navigation links into the arena.
    ///
    /// The tree owns every node; these are not ownership edges.
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,

    /// The node in the subtree rooted at this [`Node`] (possibly itself) with
    /// the greatest upper bound.
    ///
    /// Used to prune entire subtrees from searches that need an upper bound
    /// to reach some threshold.
    pub(crate) max_stop: NodeId,
}

impl<K, V> Node<K, V> {
    /// Initialise a new, unlinked red leaf stored at `id`.
    pub(crate) fn new(id: NodeId, key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            max_stop: id,
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
