//! Rendering adapter seam.
//!
//! The engine never draws anything. It tells a [`Surface`] where tiles go,
//! which tiles to tear down, and how big and where the frame is; the surface
//! maps that onto whatever display technology the host uses.

pub mod recording;

use crate::model::{Point, Size};

pub trait Surface {
    /// Opaque content handle the host delivers through `Tiler::show`.
    type Tile;

    /// Position `tile` at `at`, relative to the frame origin.
    fn place(&mut self, tile: &mut Self::Tile, at: Point);

    /// Take back a tile the engine no longer holds (evicted or replaced).
    fn detach(&mut self, tile: Self::Tile);

    fn set_frame_size(&mut self, size: Size);

    /// Position the frame relative to the viewport container.
    fn set_frame_position(&mut self, at: Point);
}

pub use recording::{RecordedTile, RecordingSurface};
