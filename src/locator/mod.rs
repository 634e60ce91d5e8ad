//! Point and polygon locators.
//!
//! A locator answers three questions about a fixed set of entities:
//!
//! - which one is nearest to a query point
//! - which ones fall in a rectangular region
//! - which ones lie within some distance of an origin point
//!
//! The strategy doing the work sits behind the [`PointIndex`] and
//! [`PolygonIndex`] traits. [`PointLocator`] and [`PolygonLocator`] wrap a
//! strategy so call sites stay the same when it is swapped; every strategy
//! returns the same result *sets*, only their order may differ.
//!
//! # Example
//!
//! ```
//! use locatum::locator::{GridPointLocator, PointLocator};
//! use locatum::{Point2, Rect2};
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 6.0),
//!     Point2::new(5.4, 1.4),
//! ];
//!
//! let brute = PointLocator::new(points.clone());
//! let gridded = PointLocator::with_index(GridPointLocator::new(points).unwrap());
//!
//! let query = Point2::new(1.0, 1.0);
//! assert_eq!(brute.nearest(&query), Ok(&Point2::new(0.0, 0.0)));
//! assert_eq!(gridded.nearest(&query), Ok(&Point2::new(0.0, 0.0)));
//! assert_eq!(brute.region(&Rect2::new(-1.0, -1.0, 10.0, 10.0)).len(), 3);
//! assert_eq!(gridded.proximity(&Point2::new(1.0, 0.0), 2.0).len(), 1);
//! ```

mod grid;
mod point;
mod polygon;

use crate::error::Result;
use crate::geometry::{Bounds2, Coord2, Shape2};

pub use grid::{GridLocatorConfig, GridPointLocator};
pub use point::{BruteForcePointLocator, PointLocator};
pub use polygon::{BruteForcePolygonLocator, PolygonLocator};

/// Scalar type of a polygon's vertices.
pub type ShapeScalar<S> = <<S as Shape2>::Point as Coord2>::Scalar;

/// A strategy for querying a fixed set of points.
pub trait PointIndex<P: Coord2> {
    /// Returns the indexed point closest to `query`.
    ///
    /// Fails with [`IndexError::EmptyIndex`](crate::IndexError::EmptyIndex)
    /// when no points are indexed.
    fn nearest(&self, query: &P) -> Result<&P>;

    /// Returns the indexed points inside `rect`, boundary included.
    fn region<R: Bounds2<Scalar = P::Scalar>>(&self, rect: &R) -> Vec<&P>;

    /// Returns the indexed points within distance `r` of `origin`, inclusive.
    fn proximity(&self, origin: &P, r: P::Scalar) -> Vec<&P>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// Returns true if no points are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A strategy for querying a fixed set of polygons.
///
/// Distances follow [`shape_distance`](crate::geometry::shape_distance):
/// zero inside a polygon, otherwise the distance to its boundary.
pub trait PolygonIndex<S: Shape2> {
    /// Returns the indexed polygon closest to `query`.
    ///
    /// Fails with [`IndexError::EmptyIndex`](crate::IndexError::EmptyIndex)
    /// when no polygon with vertices is indexed.
    fn nearest(&self, query: &S::Point) -> Result<&S>;

    /// Returns the indexed polygons whose bounding box intersects `rect`.
    fn region<R: Bounds2<Scalar = ShapeScalar<S>>>(&self, rect: &R) -> Vec<&S>;

    /// Returns the indexed polygons within distance `r` of `origin`, inclusive.
    fn proximity(&self, origin: &S::Point, r: ShapeScalar<S>) -> Vec<&S>;

    /// Number of indexed polygons.
    fn len(&self) -> usize;

    /// Returns true if no polygons are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
