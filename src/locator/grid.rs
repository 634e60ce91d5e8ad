//! Grid-backed point locator.

use super::point::nearest_by_scan;
use super::PointIndex;
use crate::error::{IndexError, Result};
use crate::geometry::{Bounds2, Coord2, Extent};
use crate::spatial::Grid;
use num_traits::{Float, ToPrimitive};
use std::fmt;

/// Upper bound on the cell count along either axis of a derived grid.
const MAX_CELLS_PER_AXIS: u32 = 1 << 20;

/// Configuration for [`GridPointLocator`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLocatorConfig<F> {
    /// Cell side length. `None` derives it from the point density.
    pub resolution: Option<F>,

    /// Average number of points per cell aimed for when the resolution is derived.
    /// Default: 4
    pub target_per_cell: usize,
}

impl<F> Default for GridLocatorConfig<F> {
    fn default() -> Self {
        Self {
            resolution: None,
            target_per_cell: 4,
        }
    }
}

impl<F: Float> GridLocatorConfig<F> {
    /// Uses a fixed cell side length.
    pub fn with_resolution(resolution: F) -> Self {
        Self {
            resolution: Some(resolution),
            ..Self::default()
        }
    }

    /// Cell side length for `count` points spread over `extent`.
    ///
    /// Aims for `target_per_cell` points per cell. Degenerate extents fall
    /// back to their longer side, then to one. A derived side never splits
    /// either axis into more than 2^20 cells, so very thin extents still
    /// produce a usable grid.
    pub fn resolve(&self, extent: &Extent<F>, count: usize) -> F {
        if let Some(resolution) = self.resolution {
            return resolution;
        }

        let n = F::from(count.max(1)).unwrap_or_else(F::one);
        let k = F::from(self.target_per_cell.max(1)).unwrap_or_else(F::one);
        let longest = extent.width().max(extent.height());
        let area = extent.width() * extent.height();

        let side = if area > F::zero() {
            (area * k / n).sqrt()
        } else {
            longest * k / n
        };
        let min_side = longest / F::from(MAX_CELLS_PER_AXIS).unwrap_or_else(F::one);
        let side = side.max(min_side);

        if side > F::zero() && side.is_finite() {
            side
        } else {
            F::one()
        }
    }
}

/// A [`PointIndex`] backed by a [`Grid`] over the points' bounding box.
///
/// Built once from a fixed point set; returns the same result sets as
/// [`BruteForcePointLocator`](super::BruteForcePointLocator).
#[derive(Clone)]
pub struct GridPointLocator<P: Coord2> {
    points: Vec<P>,
    grid: Option<Grid<P, usize>>,
}

impl<P: Coord2> GridPointLocator<P> {
    /// Indexes the points with a density-derived cell size.
    pub fn new(points: Vec<P>) -> Result<Self> {
        Self::with_config(points, GridLocatorConfig::default())
    }

    /// Indexes the points using the given configuration.
    ///
    /// Fails with [`IndexError::InvalidResolution`] for a non-positive fixed
    /// resolution and with [`IndexError::InvalidBounds`] or
    /// [`IndexError::OutOfBounds`] for points with non-finite coordinates.
    pub fn with_config(points: Vec<P>, config: GridLocatorConfig<P::Scalar>) -> Result<Self> {
        let extent = match Extent::covering(&points) {
            Some(extent) => extent,
            None => {
                return Ok(Self { points, grid: None });
            }
        };

        let resolution = config.resolve(&extent, points.len());
        let mut grid = Grid::new(&extent, resolution)?;
        for (i, p) in points.iter().enumerate() {
            grid.add(i, *p)?;
        }

        tracing::debug!(
            points = points.len(),
            cells = grid.cell_count(),
            resolution = ?resolution.to_f64(),
            "built grid point locator"
        );

        Ok(Self {
            points,
            grid: Some(grid),
        })
    }

    /// Returns the indexed points in insertion order.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Returns the underlying grid, or `None` when no points are indexed.
    pub fn grid(&self) -> Option<&Grid<P, usize>> {
        self.grid.as_ref()
    }

    fn resolve_all(&self, indices: Vec<&usize>) -> Vec<&P> {
        indices.into_iter().map(|&i| &self.points[i]).collect()
    }
}

impl<P: Coord2 + fmt::Debug> fmt::Debug for GridPointLocator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridPointLocator")
            .field("points", &self.points)
            .field("cells", &self.grid.as_ref().map(Grid::cell_count))
            .finish()
    }
}

impl<P: Coord2> PointIndex<P> for GridPointLocator<P> {
    fn nearest(&self, query: &P) -> Result<&P> {
        let grid = self.grid.as_ref().ok_or(IndexError::EmptyIndex)?;
        let index = match grid.nearest(query) {
            Some(&i) => i,
            // Non-finite query: the expanding search cannot run
            None => nearest_by_scan(&self.points, query).ok_or(IndexError::EmptyIndex)?,
        };
        Ok(&self.points[index])
    }

    fn region<R: Bounds2<Scalar = P::Scalar>>(&self, rect: &R) -> Vec<&P> {
        match &self.grid {
            Some(grid) => self.resolve_all(grid.region(rect)),
            None => Vec::new(),
        }
    }

    fn proximity(&self, origin: &P, r: P::Scalar) -> Vec<&P> {
        match &self.grid {
            Some(grid) => self.resolve_all(grid.proximity(origin, r)),
            None => Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
