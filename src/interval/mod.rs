//! One-dimensional interval indexing.
//!
//! [`IntervalTree`] is built once from a batch of `(lower, upper, payload)`
//! intervals and answers two kinds of queries:
//!
//! - which intervals contain a value (stabbing query)
//! - which intervals overlap a range
//!
//! # Example
//!
//! ```
//! use locatum::interval::{Interval, IntervalTree};
//!
//! let tree = IntervalTree::build(vec![
//!     Interval::new(-1.0, 2.0, 'A'),
//!     Interval::new(5.0, 9.0, 'B'),
//!     Interval::new(3.0, 6.0, 'C'),
//! ])
//! .unwrap();
//!
//! assert_eq!(tree.query((7.0, 14.0)), vec![&'B']);
//! assert_eq!(tree.query(1.0), vec![&'A']);
//! ```

mod tree;

pub use tree::{Interval, IntervalQuery, IntervalTree};
