use thiserror::Error;

use crate::model::{Coord, Corners};

/// Broken grid invariant found by `Tiler::verify`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("tile {coord} lies outside corners {corners}")]
    TileOutsideCorners { coord: Coord, corners: Corners },
    #[error("row {y} is present but holds no tiles")]
    EmptyRow { y: i64 },
}
