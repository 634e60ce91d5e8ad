//! Linear-scan polygon locator and its facade.

use super::{PolygonIndex, ShapeScalar};
use crate::error::{IndexError, Result};
use crate::geometry::{shape_distance, shape_extent, Bounds2, Shape2};
use std::marker::PhantomData;

/// Naive O(n) search over a fixed set of polygons.
///
/// Polygons without vertices are kept but never match a query.
#[derive(Debug, Clone)]
pub struct BruteForcePolygonLocator<S> {
    polygons: Vec<S>,
}

impl<S: Shape2> BruteForcePolygonLocator<S> {
    /// Indexes the given polygons.
    pub fn new(polygons: Vec<S>) -> Self {
        Self { polygons }
    }

    /// Returns the indexed polygons in insertion order.
    pub fn polygons(&self) -> &[S] {
        &self.polygons
    }
}

impl<S: Shape2> FromIterator<S> for BruteForcePolygonLocator<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: Shape2> PolygonIndex<S> for BruteForcePolygonLocator<S> {
    fn nearest(&self, query: &S::Point) -> Result<&S> {
        let mut best: Option<(&S, ShapeScalar<S>)> = None;
        for polygon in self.polygons.iter().filter(|p| !p.vertices().is_empty()) {
            let dist = shape_distance(polygon, query);
            match best {
                Some((_, best_dist)) if !(dist < best_dist) => {}
                _ => best = Some((polygon, dist)),
            }
        }
        best.map(|(polygon, _)| polygon).ok_or(IndexError::EmptyIndex)
    }

    fn region<R: Bounds2<Scalar = ShapeScalar<S>>>(&self, rect: &R) -> Vec<&S> {
        self.polygons
            .iter()
            .filter(|p| shape_extent(*p).map_or(false, |extent| extent.intersects(rect)))
            .collect()
    }

    fn proximity(&self, origin: &S::Point, r: ShapeScalar<S>) -> Vec<&S> {
        self.polygons
            .iter()
            .filter(|p| shape_distance(*p, origin) <= r)
            .collect()
    }

    fn len(&self) -> usize {
        self.polygons.len()
    }
}

/// Stable entry point for polygon queries.
///
/// Delegates to a [`PolygonIndex`] strategy, brute force by default.
#[derive(Debug, Clone)]
pub struct PolygonLocator<S, I = BruteForcePolygonLocator<S>> {
    index: I,
    _shape: PhantomData<fn() -> S>,
}

impl<S: Shape2> PolygonLocator<S> {
    /// Indexes the given polygons with the brute-force strategy.
    pub fn new(polygons: Vec<S>) -> Self {
        Self::with_index(BruteForcePolygonLocator::new(polygons))
    }
}

impl<S: Shape2, I: PolygonIndex<S>> PolygonLocator<S, I> {
    /// Wraps an already built strategy.
    pub fn with_index(index: I) -> Self {
        Self {
            index,
            _shape: PhantomData,
        }
    }

    /// Returns the underlying strategy.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Returns the indexed polygon closest to `query`; zero distance inside.
    pub fn nearest(&self, query: &S::Point) -> Result<&S> {
        self.index.nearest(query)
    }

    /// Returns the indexed polygons whose bounding box intersects `rect`.
    pub fn region<R: Bounds2<Scalar = ShapeScalar<S>>>(&self, rect: &R) -> Vec<&S> {
        self.index.region(rect)
    }

    /// Returns the indexed polygons within distance `r` of `origin`, inclusive.
    pub fn proximity(&self, origin: &S::Point, r: ShapeScalar<S>) -> Vec<&S> {
        self.index.proximity(origin, r)
    }

    /// Number of indexed polygons.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no polygons are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
