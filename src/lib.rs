//! locatum - Spatial lookup structures
//!
//! Indexes for answering "what is here?" questions over fixed collections:
//!
//! - [`IntervalTree`] - which 1D intervals contain a value or overlap a range
//! - [`Grid`] - a uniform bucket grid over 2D points
//! - [`PointLocator`] and [`PolygonLocator`] - nearest, region and proximity
//!   queries behind a swappable strategy
//!
//! Every structure is generic over the floating-point type and over the
//! point, rectangle and polygon types through the traits in [`geometry`].
//!
//! # Example
//!
//! ```
//! use locatum::{Point2, PointLocator, Rect2};
//!
//! let locator = PointLocator::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 6.0),
//!     Point2::new(5.4, 1.4),
//! ]);
//!
//! assert_eq!(locator.nearest(&Point2::new(5.0, 2.0)), Ok(&Point2::new(5.4, 1.4)));
//! assert_eq!(locator.region(&Rect2::new(0.0, 0.0, 1.0, 6.0)).len(), 2);
//! ```

pub mod error;
pub mod geometry;
pub mod interval;
pub mod locator;
pub mod primitives;
pub mod spatial;

pub use error::{IndexError, Result};
pub use geometry::{Bounds2, Coord2, Extent, Shape2};
pub use interval::{Interval, IntervalQuery, IntervalTree};
pub use locator::{
    BruteForcePointLocator, BruteForcePolygonLocator, GridLocatorConfig, GridPointLocator,
    PointIndex, PointLocator, PolygonIndex, PolygonLocator,
};
pub use primitives::{Point2, Polygon2, Rect2};
pub use spatial::Grid;
