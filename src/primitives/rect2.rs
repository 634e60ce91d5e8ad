//! Axis-aligned rectangle.

use crate::geometry::Bounds2;
use num_traits::Float;

/// An axis-aligned rectangle given by its four bounds.
///
/// Bounds are inclusive. Construct with [`Rect2::new`] in
/// `(left, lower, right, upper)` order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect2<F> {
    pub left: F,
    pub lower: F,
    pub right: F,
    pub upper: F,
}

impl<F: Float> Rect2<F> {
    /// Creates a rectangle from its lower-left and upper-right coordinates.
    ///
    /// Does not validate that `left <= right` and `lower <= upper`.
    #[inline]
    pub fn new(left: F, lower: F, right: F, upper: F) -> Self {
        Self {
            left,
            lower,
            right,
            upper,
        }
    }

    /// Returns the width of the rectangle.
    #[inline]
    pub fn width(self) -> F {
        self.right - self.left
    }

    /// Returns the height of the rectangle.
    #[inline]
    pub fn height(self) -> F {
        self.upper - self.lower
    }

    /// Returns `true` if `left <= right` and `lower <= upper`.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.left <= self.right && self.lower <= self.upper
    }
}

impl<F: Float> Bounds2 for Rect2<F> {
    type Scalar = F;

    #[inline]
    fn left(&self) -> F {
        self.left
    }

    #[inline]
    fn right(&self) -> F {
        self.right
    }

    #[inline]
    fn lower(&self) -> F {
        self.lower
    }

    #[inline]
    fn upper(&self) -> F {
        self.upper
    }
}
