//! Spatial data structures and queries.
//!
//! - [`Grid`] - a uniform bucket grid for 2D points with region,
//!   proximity and nearest-neighbor queries

mod grid;

pub use grid::{CellIndex, Grid};
