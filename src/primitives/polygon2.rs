//! Simple polygon type.

use super::{Point2, Rect2};
use crate::geometry::{point_in_ring, shape_distance, shape_extent, Shape2};
use num_traits::Float;

/// A simple polygon represented as a sequence of vertices.
///
/// The polygon is implicitly closed (the last vertex connects to the first).
/// Winding order is not significant for any operation in this crate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon2<F> {
    /// The vertices of the polygon in ring order.
    pub vertices: Vec<Point2<F>>,
}

impl<F: Float> Polygon2<F> {
    /// Creates a new polygon from vertices.
    #[inline]
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        Self { vertices }
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Tests if a point is inside the polygon (even-odd rule).
    pub fn contains(&self, point: Point2<F>) -> bool {
        point_in_ring(&self.vertices, &point)
    }

    /// Distance from a point to the polygon; zero inside.
    pub fn distance_to_point(&self, point: Point2<F>) -> F {
        shape_distance(self, &point)
    }

    /// Returns the bounding rectangle, or `None` for an empty polygon.
    pub fn bounding_rect(&self) -> Option<Rect2<F>> {
        shape_extent(self).map(|e| Rect2::new(e.left, e.lower, e.right, e.upper))
    }
}

impl<F: Float> Shape2 for Polygon2<F> {
    type Point = Point2<F>;

    #[inline]
    fn vertices(&self) -> &[Point2<F>] {
        &self.vertices
    }
}
