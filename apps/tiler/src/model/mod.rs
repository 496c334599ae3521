//! Plain value types shared by the grid, the viewport and the engine.

pub mod coord;
pub mod pixel;

pub use coord::{Coord, Corners, TileOffset};
pub use pixel::{Point, Size};
