//! Concrete point, rectangle and polygon types.
//!
//! These implement the traits in [`crate::geometry`]; the indexes accept
//! any other type that does too.

mod point2;
mod polygon2;
mod rect2;

pub use point2::Point2;
pub use polygon2::Polygon2;
pub use rect2::Rect2;
