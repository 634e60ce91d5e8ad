//! Linear-scan point locator and the strategy-agnostic facade.

use super::PointIndex;
use crate::error::{IndexError, Result};
use crate::geometry::{Bounds2, Coord2};
use std::marker::PhantomData;

/// Naive O(n) search over a fixed set of points.
///
/// Serves as the reference every other [`PointIndex`] must agree with.
#[derive(Debug, Clone)]
pub struct BruteForcePointLocator<P> {
    points: Vec<P>,
}

impl<P: Coord2> BruteForcePointLocator<P> {
    /// Indexes the given points.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }

    /// Returns the indexed points in insertion order.
    pub fn points(&self) -> &[P] {
        &self.points
    }
}

impl<P: Coord2> FromIterator<P> for BruteForcePointLocator<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<P: Coord2> PointIndex<P> for BruteForcePointLocator<P> {
    fn nearest(&self, query: &P) -> Result<&P> {
        nearest_by_scan(&self.points, query)
            .map(|i| &self.points[i])
            .ok_or(IndexError::EmptyIndex)
    }

    fn region<R: Bounds2<Scalar = P::Scalar>>(&self, rect: &R) -> Vec<&P> {
        self.points
            .iter()
            .filter(|p| rect.intersect_point(**p).is_some())
            .collect()
    }

    fn proximity(&self, origin: &P, r: P::Scalar) -> Vec<&P> {
        self.points
            .iter()
            .filter(|p| p.distance(origin) <= r)
            .collect()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Stable entry point for point queries.
///
/// Delegates to a [`PointIndex`] strategy, brute force by default. Swapping
/// the strategy (for instance to [`GridPointLocator`](super::GridPointLocator))
/// leaves result sets unchanged.
#[derive(Debug, Clone)]
pub struct PointLocator<P, I = BruteForcePointLocator<P>> {
    index: I,
    _point: PhantomData<fn() -> P>,
}

impl<P: Coord2> PointLocator<P> {
    /// Indexes the given points with the brute-force strategy.
    pub fn new(points: Vec<P>) -> Self {
        Self::with_index(BruteForcePointLocator::new(points))
    }
}

impl<P: Coord2, I: PointIndex<P>> PointLocator<P, I> {
    /// Wraps an already built strategy.
    pub fn with_index(index: I) -> Self {
        Self {
            index,
            _point: PhantomData,
        }
    }

    /// Returns the underlying strategy.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Returns the indexed point closest to `query`.
    pub fn nearest(&self, query: &P) -> Result<&P> {
        self.index.nearest(query)
    }

    /// Returns the indexed points inside `rect`, boundary included.
    pub fn region<R: Bounds2<Scalar = P::Scalar>>(&self, rect: &R) -> Vec<&P> {
        self.index.region(rect)
    }

    /// Returns the indexed points within distance `r` of `origin`, inclusive.
    pub fn proximity(&self, origin: &P, r: P::Scalar) -> Vec<&P> {
        self.index.proximity(origin, r)
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Index of the point closest to `query` by linear scan, first wins on ties.
pub(super) fn nearest_by_scan<P: Coord2>(points: &[P], query: &P) -> Option<usize> {
    let mut best: Option<(usize, P::Scalar)> = None;
    for (i, p) in points.iter().enumerate() {
        let dist = p.distance(query);
        match best {
            Some((_, best_dist)) if !(dist < best_dist) => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}
