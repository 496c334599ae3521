//! Sparse storage for materialized tiles.
//!
//! [`SparseGrid`] keeps rows keyed by `y`, each holding cells keyed by `x`.
//! Rows disappear as soon as their last cell is removed, so sweeping the
//! viewport across never-revisited space does not accumulate empty rows.
//!
//! ```
//! # use tiler::cache::SparseGrid;
//! # use tiler::model::Coord;
//! let mut grid = SparseGrid::new();
//! grid.set(Coord::new(3, -1), "tile");
//! assert_eq!(grid.get(Coord::new(3, -1)), Some(&"tile"));
//! assert_eq!(grid.remove(Coord::new(3, -1)), Some("tile"));
//! assert_eq!(grid.row_count(), 0);
//! ```
//!
//! Design goals:
//! - O(1) amortized insert, lookup and removal
//! - Deterministic enumeration (ascending `y`, then ascending `x`)
//! - No failure modes: absence is a normal answer

pub mod grid;

pub use grid::SparseGrid;
