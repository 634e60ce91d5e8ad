//! Geometry contract consumed by the indexes.
//!
//! The interval tree, grid and locators never name a concrete point,
//! rectangle or polygon type. They work against three small traits:
//!
//! - [`Coord2`] - a 2D point with Euclidean [`distance`](Coord2::distance)
//! - [`Bounds2`] - an axis-aligned rectangle given by `left`, `right`, `lower`, `upper`
//! - [`Shape2`] - a polygon given as an ordered ring of vertices
//!
//! The types in [`crate::primitives`] implement them, as does the plain
//! `(F, F)` tuple for points.

use num_traits::{Float, One, Zero};

/// A point in the plane.
pub trait Coord2: Copy + PartialEq {
    /// Scalar type of the coordinates.
    type Scalar: Float;

    /// Returns the x coordinate.
    fn x(&self) -> Self::Scalar;

    /// Returns the y coordinate.
    fn y(&self) -> Self::Scalar;

    /// Euclidean distance to another point.
    #[inline]
    fn distance(&self, other: &Self) -> Self::Scalar {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }
}

impl<F: Float> Coord2 for (F, F) {
    type Scalar = F;

    #[inline]
    fn x(&self) -> F {
        self.0
    }

    #[inline]
    fn y(&self) -> F {
        self.1
    }
}

/// An axis-aligned rectangle with inclusive bounds.
///
/// Implementations are expected to satisfy `left <= right` and `lower <= upper`.
pub trait Bounds2 {
    /// Scalar type of the bounds.
    type Scalar: Float;

    /// Smallest x value.
    fn left(&self) -> Self::Scalar;

    /// Largest x value.
    fn right(&self) -> Self::Scalar;

    /// Smallest y value.
    fn lower(&self) -> Self::Scalar;

    /// Largest y value.
    fn upper(&self) -> Self::Scalar;

    /// Returns `true` if the point lies inside the rectangle, boundary included.
    #[inline]
    fn contains<P: Coord2<Scalar = Self::Scalar>>(&self, p: &P) -> bool {
        self.left() <= p.x() && p.x() <= self.right() && self.lower() <= p.y() && p.y() <= self.upper()
    }

    /// Returns the point itself if it lies inside the rectangle.
    #[inline]
    fn intersect_point<P: Coord2<Scalar = Self::Scalar>>(&self, p: P) -> Option<P> {
        if self.contains(&p) {
            Some(p)
        } else {
            None
        }
    }
}

/// A polygon described by its vertex ring.
///
/// The ring is implicitly closed: the last vertex connects to the first.
pub trait Shape2 {
    /// Vertex type.
    type Point: Coord2;

    /// Returns the vertices in ring order.
    fn vertices(&self) -> &[Self::Point];
}

/// Plain rectangle snapshot used internally by the indexes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent<F> {
    pub left: F,
    pub lower: F,
    pub right: F,
    pub upper: F,
}

impl<F: Float> Extent<F> {
    /// Creates an extent from its four bounds.
    #[inline]
    pub fn new(left: F, lower: F, right: F, upper: F) -> Self {
        Self {
            left,
            lower,
            right,
            upper,
        }
    }

    /// Copies the bounds of any rectangle.
    #[inline]
    pub fn from_bounds<R: Bounds2<Scalar = F>>(rect: &R) -> Self {
        Self::new(rect.left(), rect.lower(), rect.right(), rect.upper())
    }

    /// Smallest extent covering every point.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn covering<'a, P, I>(points: I) -> Option<Self>
    where
        P: Coord2<Scalar = F> + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut extent = Self::new(first.x(), first.y(), first.x(), first.y());
        for p in iter {
            extent.left = extent.left.min(p.x());
            extent.lower = extent.lower.min(p.y());
            extent.right = extent.right.max(p.x());
            extent.upper = extent.upper.max(p.y());
        }
        Some(extent)
    }

    /// Width of the extent.
    #[inline]
    pub fn width(&self) -> F {
        self.right - self.left
    }

    /// Height of the extent.
    #[inline]
    pub fn height(&self) -> F {
        self.upper - self.lower
    }

    /// Returns `true` if both extents share at least one point.
    #[inline]
    pub fn intersects<R: Bounds2<Scalar = F>>(&self, other: &R) -> bool {
        self.left <= other.right()
            && self.right >= other.left()
            && self.lower <= other.upper()
            && self.upper >= other.lower()
    }

    /// The four corners, counter-clockwise from the lower-left one.
    pub fn corners(&self) -> [(F, F); 4] {
        [
            (self.left, self.lower),
            (self.right, self.lower),
            (self.right, self.upper),
            (self.left, self.upper),
        ]
    }
}

impl<F: Float> Bounds2 for Extent<F> {
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

/// Distance from `p` to the segment `a`-`b`.
pub fn point_segment_distance<P: Coord2>(p: &P, a: &P, b: &P) -> P::Scalar {
    let vx = b.x() - a.x();
    let vy = b.y() - a.y();
    let len_sq = vx * vx + vy * vy;

    // Degenerate segment (a == b)
    if !(len_sq > P::Scalar::zero()) {
        return p.distance(a);
    }

    let t = ((p.x() - a.x()) * vx + (p.y() - a.y()) * vy) / len_sq;
    let t = t.max(P::Scalar::zero()).min(P::Scalar::one());

    let cx = a.x() + vx * t;
    let cy = a.y() + vy * t;
    (p.x() - cx).hypot(p.y() - cy)
}

/// Even-odd ray casting test for a point against a vertex ring.
///
/// Points on the boundary may return either true or false.
pub fn point_in_ring<P: Coord2>(vertices: &[P], p: &P) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = &vertices[i];
        let vj = &vertices[j];

        if ((vi.y() > p.y()) != (vj.y() > p.y()))
            && (p.x() < (vj.x() - vi.x()) * (p.y() - vi.y()) / (vj.y() - vi.y()) + vi.x())
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Distance from a point to a polygon.
///
/// Zero when the point lies inside the ring, otherwise the distance to the
/// closest boundary edge. A polygon without vertices is infinitely far away.
pub fn shape_distance<S, P>(shape: &S, p: &P) -> P::Scalar
where
    S: Shape2<Point = P>,
    P: Coord2,
{
    let vertices = shape.vertices();
    match vertices.len() {
        0 => P::Scalar::infinity(),
        1 => p.distance(&vertices[0]),
        n => {
            if point_in_ring(vertices, p) {
                return P::Scalar::zero();
            }
            (0..n)
                .map(|i| point_segment_distance(p, &vertices[i], &vertices[(i + 1) % n]))
                .fold(P::Scalar::infinity(), |a, b| a.min(b))
        }
    }
}

/// Bounding extent of a polygon, or `None` if it has no vertices.
pub fn shape_extent<S, P>(shape: &S) -> Option<Extent<P::Scalar>>
where
    S: Shape2<Point = P>,
    P: Coord2,
{
    Extent::covering(shape.vertices())
}
