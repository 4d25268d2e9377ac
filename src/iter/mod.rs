mod owned_iter;
mod query_iter;

pub use owned_iter::*;
pub use query_iter::*;
