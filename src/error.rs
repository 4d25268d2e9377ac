use thiserror::Error;

/// Errors returned by [`Cursor`](crate::Cursor) operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The tree was structurally modified by something other than this
    /// cursor after the cursor was created.
    #[error("tree was modified outside of the cursor")]
    ConcurrentModification,

    /// `remove()` was called before any `next()`, or twice without an
    /// intervening `next()`.
    #[error("cursor has no current entry to remove")]
    IllegalState,
}

/// A broken structural invariant, reported by
/// [`IntervalTree::validate()`](crate::IntervalTree::validate).
///
/// Keys are rendered with their [`Debug`] representation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("root node {key} is red")]
    RedRoot { key: String },

    #[error("red node {key} has a red child")]
    RedRed { key: String },

    #[error("paths below node {key} have different black heights ({left} != {right})")]
    BlackHeight {
        key: String,
        left: usize,
        right: usize,
    },

    #[error("child of node {key} does not link back to it as its parent")]
    ParentLink { key: String },

    #[error("node {key} is ordered before its in-order predecessor {prev}")]
    Order { key: String, prev: String },

    #[error("node {key} caches max_stop {got} but its subtree reaches {want}")]
    MaxStop {
        key: String,
        got: String,
        want: String,
    },

    #[error("node {key} caches max_stop {got} from outside its subtree")]
    MaxStopOutsideSubtree { key: String, got: String },

    #[error("{reachable} nodes are reachable from the root, but the tree holds {len}")]
    Len { reachable: usize, len: usize },
}
