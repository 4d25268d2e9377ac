//! An augmented red-black [`IntervalTree`] for efficient interval queries.
//!
//! The tree stores `(interval, value)` tuples ordered by lower bound, then
//! upper bound, and caches a reference to the greatest upper bound of every
//! subtree. Searches use this to skip subtrees that cannot contain a match,
//! answering each of these query families in `O(log n + k)` time:
//!
//! * **Equivalent**: intervals with the same bounds as the query.
//! * **Intersecting**: intervals sharing at least one point with the query.
//! * **Superset**: intervals containing the query.
//! * **Subset**: intervals contained by the query.
//!
//! Additionally [`IntervalTree::covers()`] tests whether the union of all
//! stored intervals contains the query.
//!
//! ```
//! use interrb::{IntervalTree, Query};
//!
//! let mut t = IntervalTree::default();
//! t.insert(1..5, "a");
//! t.insert(3..4, "b");
//! t.insert(4..9, "c");
//! t.insert(3..3, "point");
//!
//! // Which intervals contain the point 3?
//! let got = t.iter_intersecting(&(3..3)).map(|(_, v)| *v).collect::<Vec<_>>();
//! assert_eq!(got, ["a", "point", "b"]);
//!
//! // Which are contained by [3, 9)?
//! let got = t.iter_subset(&(3..9)).map(|(_, v)| *v).collect::<Vec<_>>();
//! assert_eq!(got, ["point", "b", "c"]);
//!
//! // And the same, in reverse, through a view.
//! let q = 3..9;
//! let view = t.query(Query::Subset(&q)).rev();
//! assert_eq!(view.first(), Some((&(4..9), &"c")));
//!
//! assert!(t.covers(&(2..8)));
//! assert!(!t.covers(&(0..2)));
//! ```
//!
//! Interval semantics are defined by an [`IntervalComparator`], allowing any
//! key type to be indexed. The default [`HalfOpen`] comparator treats
//! [`Range`] (and `[start, end]` array) keys as half-open intervals, with an
//! empty range `[p, p)` representing the single point `p`.
//!
//! [`Range`]: std::ops::Range

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::explicit_iter_loop,
    clippy::todo,
    clippy::use_self,
    missing_debug_implementations,
    unused_crate_dependencies
)]

mod balance;
mod comparator;
mod cursor;
mod error;
mod iter;
mod node;
mod query;
mod tree;
mod validate;
mod view;

pub use comparator::*;
pub use cursor::*;
pub use error::*;
pub use iter::*;
pub use query::{Direction, Query};
pub use tree::*;
pub use view::*;

#[cfg(test)]
mod test_utils;

// Only used by the benchmarks.
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use paste as _;
