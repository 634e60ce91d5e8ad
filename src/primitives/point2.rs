//! 2D point type.

use crate::geometry::Coord2;
use num_traits::Float;

/// A 2D point with x and y coordinates.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Point2<F> {
    /// Creates a new point.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    ///
    /// Delegates to [`Coord2::distance`].
    #[inline]
    pub fn distance(self, other: Self) -> F {
        Coord2::distance(&self, &other)
    }
}

impl<F: Float> Coord2 for Point2<F> {
    type Scalar = F;

    #[inline]
    fn x(&self) -> F {
        self.x
    }

    #[inline]
    fn y(&self) -> F {
        self.y
    }
}

impl<F: Float> From<(F, F)> for Point2<F> {
    fn from((x, y): (F, F)) -> Self {
        Self { x, y }
    }
}
