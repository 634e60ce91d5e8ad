//! Uniform bucket grid for 2D points.
//!
//! The grid covers a bounding rectangle with square cells of side
//! `resolution`. Every `(point, item)` pair lives in the bucket of the cell
//! its point falls into; buckets are created on first insertion and dropped
//! when their last entry is removed.
//!
//! # Example
//!
//! ```
//! use locatum::spatial::Grid;
//! use locatum::{Point2, Rect2};
//!
//! let mut grid: Grid<Point2<f64>, char> =
//!     Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
//! grid.add('A', Point2::new(1.0, 1.0)).unwrap();
//! grid.add('B', Point2::new(4.0, 4.0)).unwrap();
//!
//! assert_eq!(grid.region(&Rect2::new(0.0, 0.0, 3.0, 3.0)), vec![&'A']);
//! assert_eq!(grid.proximity(&Point2::new(6.0, 5.0), 3.0), vec![&'B']);
//! assert_eq!(grid.nearest(&Point2::new(7.0, 5.0)), Some(&'B'));
//! ```

use crate::error::{IndexError, Result};
use crate::geometry::{Bounds2, Coord2, Extent};
use num_traits::{Float, ToPrimitive, Zero};
use std::collections::HashMap;

/// Integer `(i, j)` coordinates of a grid cell.
pub type CellIndex = (i64, i64);

/// A uniform spatial hash over points inside a bounding rectangle.
///
/// # Complexity
///
/// - Add / remove: O(1) expected plus the bucket length
/// - Region and proximity: proportional to the cells spanned by the query
/// - Nearest: O(log(extent / resolution)) doubling rounds, each a proximity scan
#[derive(Debug, Clone)]
pub struct Grid<P: Coord2, T> {
    extent: Extent<P::Scalar>,
    resolution: P::Scalar,
    i_range: i64,
    j_range: i64,
    cells: HashMap<CellIndex, Vec<(P, T)>>,
    len: usize,
}

impl<P: Coord2, T> Grid<P, T> {
    /// Creates an empty grid over `bounds` with cells of side `resolution`.
    ///
    /// Fails with [`IndexError::InvalidResolution`] if `resolution <= 0`, and
    /// with [`IndexError::InvalidBounds`] if the rectangle is inverted or not
    /// finite.
    pub fn new<R: Bounds2<Scalar = P::Scalar>>(bounds: &R, resolution: P::Scalar) -> Result<Self> {
        if !(resolution > P::Scalar::zero()) {
            return Err(IndexError::InvalidResolution);
        }

        let extent = Extent::from_bounds(bounds);
        let finite = [extent.left, extent.lower, extent.right, extent.upper]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !(extent.left <= extent.right && extent.lower <= extent.upper) {
            return Err(IndexError::InvalidBounds);
        }

        let i_range = (extent.width() / resolution)
            .ceil()
            .to_i64()
            .ok_or(IndexError::InvalidResolution)?;
        let j_range = (extent.height() / resolution)
            .ceil()
            .to_i64()
            .ok_or(IndexError::InvalidResolution)?;

        tracing::debug!(
            i_range,
            j_range,
            resolution = ?resolution.to_f64(),
            "created grid"
        );

        Ok(Self {
            extent,
            resolution,
            i_range,
            j_range,
            cells: HashMap::new(),
            len: 0,
        })
    }

    /// Returns the grid's bounding rectangle.
    pub fn bounds(&self) -> Extent<P::Scalar> {
        self.extent
    }

    /// Returns the cell side length.
    pub fn resolution(&self) -> P::Scalar {
        self.resolution
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the grid holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the point lies inside the grid bounds, boundary included.
    pub fn in_grid(&self, point: &P) -> bool {
        self.extent.contains(point)
    }

    /// Returns the cell a point maps to.
    ///
    /// Indices are clamped to `[0, i_range] x [0, j_range]`, so points on the
    /// right or upper boundary land in the last cell and points outside the
    /// grid land in the nearest border cell.
    pub fn cell_of(&self, point: &P) -> CellIndex {
        self.cell_at(point.x(), point.y())
    }

    /// Iterates over every stored `(point, item)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> + '_ {
        self.cells
            .values()
            .flat_map(|bucket| bucket.iter().map(|(p, item)| (p, item)))
    }

    /// Adds an item at a location and returns a reference to it.
    ///
    /// Fails with [`IndexError::OutOfBounds`] if the point is outside the grid.
    pub fn add(&mut self, item: T, point: P) -> Result<&T> {
        self.check_bounds(&point)?;

        let cell = self.cell_of(&point);
        tracing::trace!(?cell, "grid add");

        let bucket = self.cells.entry(cell).or_default();
        bucket.push((point, item));
        self.len += 1;
        Ok(&bucket[bucket.len() - 1].1)
    }

    /// Removes the first entry matching both `item` and `point`.
    ///
    /// Fails with [`IndexError::OutOfBounds`] if the point is outside the
    /// grid and with [`IndexError::NotFound`] if no such entry exists.
    pub fn remove(&mut self, item: &T, point: P) -> Result<T>
    where
        T: PartialEq,
    {
        self.check_bounds(&point)?;

        let cell = self.cell_of(&point);
        let bucket = self.cells.get_mut(&cell).ok_or(IndexError::NotFound)?;
        let pos = bucket
            .iter()
            .position(|(p, stored)| *p == point && stored == item)
            .ok_or(IndexError::NotFound)?;

        let (_, removed) = bucket.remove(pos);
        if bucket.is_empty() {
            self.cells.remove(&cell);
        }
        self.len -= 1;
        tracing::trace!(?cell, "grid remove");
        Ok(removed)
    }

    /// Returns the items whose points lie inside `rect`, boundary included.
    ///
    /// No order is guaranteed across cells.
    pub fn region<R: Bounds2<Scalar = P::Scalar>>(&self, rect: &R) -> Vec<&T> {
        let lo = self.cell_at(rect.left(), rect.lower());
        let hi = self.cell_at(rect.right(), rect.upper());
        self.entries_in_span(lo, hi)
            .filter(|(p, _)| rect.contains(p))
            .map(|(_, item)| item)
            .collect()
    }

    /// Returns the items within Euclidean distance `r` of `point`, inclusive.
    pub fn proximity(&self, point: &P, r: P::Scalar) -> Vec<&T> {
        self.within(point, r).map(|(_, item)| item).collect()
    }

    /// Returns the item closest to `point`, or `None` if the grid is empty.
    ///
    /// The search radius starts at one cell and doubles until it holds a
    /// candidate or covers the whole grid. Among equally distant candidates
    /// the first in cell order, then insertion order, wins.
    pub fn nearest(&self, point: &P) -> Option<&T> {
        self.nearest_entry(point).map(|(_, item, _)| item)
    }

    /// Like [`nearest`](Self::nearest), also returning the stored point and its distance.
    pub fn nearest_entry(&self, point: &P) -> Option<(&P, &T, P::Scalar)> {
        if self.is_empty() || !(point.x().is_finite() && point.y().is_finite()) {
            return None;
        }

        let corners = self.extent.corners();
        let covers_grid = |radius: P::Scalar| {
            corners
                .iter()
                .all(|&(cx, cy)| (cx - point.x()).hypot(cy - point.y()) <= radius)
        };

        let mut search = self.resolution;
        while self.within(point, search).next().is_none() && !covers_grid(search) {
            search = search + search;
            tracing::trace!(search = ?search.to_f64(), "grid nearest: widening search");
        }

        let (lo, hi) = self.span_around(point, search);
        let mut best: Option<(&P, &T, P::Scalar)> = None;
        for (p, item) in self.entries_in_span(lo, hi) {
            let dist = point.distance(p);
            match best {
                Some((_, _, best_dist)) if !(dist < best_dist) => {}
                _ => best = Some((p, item, dist)),
            }
        }
        best
    }

    fn check_bounds(&self, point: &P) -> Result<()> {
        if self.in_grid(point) {
            Ok(())
        } else {
            Err(IndexError::OutOfBounds {
                x: point.x().to_f64().unwrap_or(f64::NAN),
                y: point.y().to_f64().unwrap_or(f64::NAN),
            })
        }
    }

    fn cell_at(&self, x: P::Scalar, y: P::Scalar) -> CellIndex {
        (
            self.axis_cell(x - self.extent.left, self.i_range),
            self.axis_cell(y - self.extent.lower, self.j_range),
        )
    }

    fn axis_cell(&self, offset: P::Scalar, range: i64) -> i64 {
        let cell = (offset / self.resolution)
            .floor()
            .to_i64()
            // Out of i64 range or NaN
            .unwrap_or(if offset > P::Scalar::zero() { range } else { 0 });
        cell.clamp(0, range)
    }

    /// Cell span of the square of half-side `r` around `point`.
    fn span_around(&self, point: &P, r: P::Scalar) -> (CellIndex, CellIndex) {
        (
            self.cell_at(point.x() - r, point.y() - r),
            self.cell_at(point.x() + r, point.y() + r),
        )
    }

    /// Entries within distance `r` of `point`.
    fn within(&self, point: &P, r: P::Scalar) -> impl Iterator<Item = &(P, T)> + '_ {
        let (lo, hi) = self.span_around(point, r);
        let point = *point;
        self.entries_in_span(lo, hi)
            .filter(move |(p, _)| point.distance(p) <= r)
    }

    /// Entries of every bucket in the inclusive cell span, in `(i, j)` order.
    fn entries_in_span(&self, lo: CellIndex, hi: CellIndex) -> impl Iterator<Item = &(P, T)> + '_ {
        self.buckets_in_span(lo, hi).into_iter().flatten()
    }

    fn buckets_in_span(&self, lo: CellIndex, hi: CellIndex) -> Vec<&Vec<(P, T)>> {
        if lo.0 > hi.0 || lo.1 > hi.1 {
            return Vec::new();
        }

        let span = (hi.0 - lo.0 + 1).saturating_mul(hi.1 - lo.1 + 1);
        if span <= self.cells.len() as i64 {
            (lo.0..=hi.0)
                .flat_map(|i| (lo.1..=hi.1).map(move |j| (i, j)))
                .filter_map(|cell| self.cells.get(&cell))
                .collect()
        } else {
            // Sparse grid: walk the occupied cells instead of the span
            let mut occupied: Vec<(&CellIndex, &Vec<(P, T)>)> = self
                .cells
                .iter()
                .filter(|(cell, _)| {
                    lo.0 <= cell.0 && cell.0 <= hi.0 && lo.1 <= cell.1 && cell.1 <= hi.1
                })
                .collect();
            occupied.sort_by_key(|(cell, _)| **cell);
            occupied.into_iter().map(|(_, bucket)| bucket).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Point2, Rect2};
    use approx::assert_relative_eq;

    fn sorted<T: Ord + Copy>(found: Vec<&T>) -> Vec<T> {
        let mut values: Vec<T> = found.into_iter().copied().collect();
        values.sort();
        values
    }

    fn sample_grid() -> Grid<Point2<f64>, char> {
        let mut grid = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
        grid.add('A', Point2::new(1.0, 1.0)).unwrap();
        grid.add('B', Point2::new(4.0, 4.0)).unwrap();
        grid
    }

    #[test]
    fn test_new_rejects_bad_resolution() {
        let bounds: Rect2<f64> = Rect2::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            Grid::<Point2<f64>, char>::new(&bounds, 0.0).unwrap_err(),
            IndexError::InvalidResolution
        );
        assert_eq!(
            Grid::<Point2<f64>, char>::new(&bounds, -1.0).unwrap_err(),
            IndexError::InvalidResolution
        );
        assert_eq!(
            Grid::<Point2<f64>, char>::new(&bounds, f64::NAN).unwrap_err(),
            IndexError::InvalidResolution
        );
    }

    #[test]
    fn test_new_rejects_bad_bounds() {
        let inverted: Rect2<f64> = Rect2::new(10.0, 0.0, 0.0, 10.0);
        assert_eq!(
            Grid::<Point2<f64>, char>::new(&inverted, 1.0).unwrap_err(),
            IndexError::InvalidBounds
        );
        let unbounded: Rect2<f64> = Rect2::new(0.0, 0.0, f64::INFINITY, 10.0);
        assert_eq!(
            Grid::<Point2<f64>, char>::new(&unbounded, 1.0).unwrap_err(),
            IndexError::InvalidBounds
        );
    }

    #[test]
    fn test_cell_of() {
        let grid: Grid<Point2<f64>, char> = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 5.0), 2.0).unwrap();
        assert_eq!(grid.cell_of(&Point2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(&Point2::new(3.9, 2.1)), (1, 1));
        // Right/upper boundary clamps into the last cell
        assert_eq!(grid.cell_of(&Point2::new(10.0, 5.0)), (5, 2));
        // Outside points clamp to the border
        assert_eq!(grid.cell_of(&Point2::new(-4.0, 100.0)), (0, 3));
        assert_eq!(grid.cell_of(&Point2::new(f64::NAN, f64::INFINITY)), (0, 3));
    }

    #[test]
    fn test_cell_of_offset_origin() {
        let grid: Grid<Point2<f64>, char> = Grid::new(&Rect2::new(-5.0, 10.0, 5.0, 20.0), 2.5).unwrap();
        assert_eq!(grid.cell_of(&Point2::new(-5.0, 10.0)), (0, 0));
        assert_eq!(grid.cell_of(&Point2::new(0.0, 15.0)), (2, 2));
    }

    #[test]
    fn test_add_returns_item() {
        let mut grid: Grid<Point2<f64>, char> = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
        assert_eq!(grid.add('A', Point2::new(4.2, 8.7)), Ok(&'A'));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_add_out_of_bounds() {
        let mut grid = sample_grid();
        assert_eq!(
            grid.add('C', Point2::new(11.0, 5.0)),
            Err(IndexError::OutOfBounds { x: 11.0, y: 5.0 })
        );
        assert_eq!(
            grid.remove(&'A', Point2::new(-1.0, 1.0)),
            Err(IndexError::OutOfBounds { x: -1.0, y: 1.0 })
        );
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut grid = sample_grid();
        assert_eq!(grid.remove(&'A', Point2::new(1.0, 1.0)), Ok('A'));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.cell_count(), 1);
        assert!(grid.region(&Rect2::new(0.0, 0.0, 3.0, 3.0)).is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut grid = sample_grid();
        // Right item, wrong location
        assert_eq!(grid.remove(&'A', Point2::new(4.0, 4.0)), Err(IndexError::NotFound));
        // Empty cell
        assert_eq!(grid.remove(&'A', Point2::new(9.0, 9.0)), Err(IndexError::NotFound));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_remove_duplicate_pairs_one_at_a_time() {
        let mut grid: Grid<Point2<f64>, i32> = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
        let p = Point2::new(2.5, 2.5);
        grid.add(7, p).unwrap();
        grid.add(7, p).unwrap();

        grid.remove(&7, p).unwrap();
        assert_eq!(grid.proximity(&p, 0.0), vec![&7]);
        grid.remove(&7, p).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn test_region() {
        let grid = sample_grid();
        assert_eq!(grid.region(&Rect2::new(0.0, 0.0, 3.0, 3.0)), vec![&'A']);
        assert_eq!(grid.region(&Rect2::new(2.0, 2.0, 5.0, 5.0)), vec![&'B']);
        assert_eq!(sorted(grid.region(&Rect2::new(0.0, 0.0, 5.0, 5.0))), vec!['A', 'B']);
        // Inclusive bounds
        assert_eq!(grid.region(&Rect2::new(4.0, 4.0, 4.0, 4.0)), vec![&'B']);
        // Query extending past the grid
        assert_eq!(sorted(grid.region(&Rect2::new(-50.0, -50.0, 50.0, 50.0))), vec!['A', 'B']);
    }

    #[test]
    fn test_proximity() {
        let grid = sample_grid();
        assert_eq!(grid.proximity(&Point2::new(2.0, 1.0), 2.0), vec![&'A']);
        assert_eq!(grid.proximity(&Point2::new(6.0, 5.0), 3.0), vec![&'B']);
        assert_eq!(sorted(grid.proximity(&Point2::new(4.0, 1.0), 4.0)), vec!['A', 'B']);
        // Distance exactly r is included
        assert_eq!(grid.proximity(&Point2::new(7.0, 4.0), 3.0), vec![&'B']);
        assert!(grid.proximity(&Point2::new(9.0, 9.0), 1.0).is_empty());
    }

    #[test]
    fn test_proximity_results_outlive_query_point() {
        let mut grid: Grid<Point2<f32>, u8> = Grid::new(&Rect2::new(0.0, 0.0, 8.0, 8.0), 2.0).unwrap();
        grid.add(1, Point2::new(1.0, 1.0)).unwrap();
        grid.add(2, Point2::new(7.5, 7.5)).unwrap();

        let found = {
            let origin = Point2::new(0.5, 0.5);
            grid.proximity(&origin, 1.0)
        };
        assert_eq!(found, vec![&1]);
        assert_eq!(grid.cell_of(&Point2::new(8.0, 8.0)), (4, 4));
    }

    #[test]
    fn test_nearest() {
        let grid = sample_grid();
        assert_eq!(grid.nearest(&Point2::new(2.0, 1.0)), Some(&'A'));
        assert_eq!(grid.nearest(&Point2::new(7.0, 5.0)), Some(&'B'));
    }

    #[test]
    fn test_nearest_empty() {
        let grid: Grid<Point2<f64>, char> = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
        assert_eq!(grid.nearest(&Point2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_nearest_far_corner() {
        let mut grid: Grid<Point2<f64>, &str> =
            Grid::new(&Rect2::new(0.0, 0.0, 100.0, 100.0), 0.5).unwrap();
        grid.add("far", Point2::new(99.0, 99.0)).unwrap();

        let (p, item, dist) = grid.nearest_entry(&Point2::new(0.0, 0.0)).unwrap();
        assert_eq!(*item, "far");
        assert_eq!(*p, Point2::new(99.0, 99.0));
        assert_relative_eq!(dist, 99.0 * 2.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_nearest_query_outside_grid() {
        let grid = sample_grid();
        assert_eq!(grid.nearest(&Point2::new(-20.0, -20.0)), Some(&'A'));
        assert_eq!(grid.nearest(&Point2::new(40.0, 30.0)), Some(&'B'));
        assert_eq!(grid.nearest(&Point2::new(f64::NAN, 0.0)), None);
    }

    #[test]
    fn test_nearest_tie_is_deterministic() {
        let mut grid: Grid<Point2<f64>, i32> = Grid::new(&Rect2::new(0.0, 0.0, 10.0, 10.0), 1.0).unwrap();
        grid.add(1, Point2::new(4.0, 5.0)).unwrap();
        grid.add(2, Point2::new(6.0, 5.0)).unwrap();
        grid.add(3, Point2::new(4.0, 5.0)).unwrap();

        for _ in 0..10 {
            assert_eq!(grid.nearest(&Point2::new(5.0, 5.0)), Some(&1));
        }
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let mut grid: Grid<Point2<f64>, i32> =
            Grid::new(&Rect2::new(0.0, 0.0, 100.0, 100.0), 3.0).unwrap();
        let mut points = Vec::new();
        for i in 0..500 {
            let p = Point2::new((i * 7 % 100) as f64, (i * 13 % 97) as f64);
            grid.add(i, p).unwrap();
            points.push(p);
        }

        for q in [Point2::new(50.0, 50.0), Point2::new(0.5, 99.5), Point2::new(33.3, 1.0)] {
            let (_, _, dist) = grid.nearest_entry(&q).unwrap();
            let brute = points
                .iter()
                .map(|p| p.distance(&q))
                .fold(f64::MAX, f64::min);
            assert_relative_eq!(dist, brute, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sparse_span_walks_occupied_cells() {
        let mut grid: Grid<Point2<f64>, char> =
            Grid::new(&Rect2::new(0.0, 0.0, 1000.0, 1000.0), 0.01).unwrap();
        grid.add('x', Point2::new(500.0, 500.0)).unwrap();
        grid.add('y', Point2::new(999.0, 1.0)).unwrap();
        assert_eq!(sorted(grid.region(&Rect2::new(0.0, 0.0, 1000.0, 1000.0))), vec!['x', 'y']);
        assert_eq!(grid.nearest(&Point2::new(990.0, 0.0)), Some(&'y'));
    }

    #[test]
    fn test_iter() {
        let grid = sample_grid();
        let mut items: Vec<char> = grid.iter().map(|(_, item)| *item).collect();
        items.sort();
        assert_eq!(items, vec!['A', 'B']);
    }

    #[test]
    fn test_tuple_points() {
        let mut grid: Grid<(f32, f32), &str> = Grid::new(&Rect2::new(0.0, 0.0, 4.0, 4.0), 1.0).unwrap();
        grid.add("p", (1.0, 1.0)).unwrap();
        assert_eq!(grid.nearest(&(3.0, 3.0)), Some(&"p"));
    }
}
