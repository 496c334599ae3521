//! Viewport geometry: the anchor, the margin ring, and the rectangle of tiles
//! that must be materialized for the current container size.

pub mod position;

use tracing::trace;

use crate::config::TilerConfig;
use crate::model::{Coord, Corners, Point, Size, TileOffset};

#[derive(Clone, Debug)]
pub struct ViewportState {
    anchor: Coord,
    tile_size: Option<u32>,
    margin: u32,
    size: Size,
    cols: u32,
    rows: u32,
    corners: Corners,
}

impl ViewportState {
    pub fn new(config: &TilerConfig, size: Size) -> Self {
        let mut state = Self {
            anchor: Coord::new(config.x, config.y),
            tile_size: config.tile_size,
            margin: config.margin,
            size,
            cols: 0,
            rows: 0,
            corners: Corners::EMPTY,
        };
        state.recompute();
        state
    }

    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    pub fn tile_size(&self) -> Option<u32> {
        self.tile_size
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cols_count(&self) -> u32 {
        self.cols
    }

    pub fn rows_count(&self) -> u32 {
        self.rows
    }

    pub fn corners(&self) -> Corners {
        self.corners
    }

    /// Replace the anchor and refresh the derived bounds.
    pub fn set_anchor(&mut self, anchor: Coord) {
        self.anchor = anchor;
        self.recompute();
    }

    /// Move the anchor against a resolved frame offset and refresh the
    /// derived bounds.
    pub fn retreat(&mut self, offset: TileOffset) {
        self.set_anchor(self.anchor.retreat(offset));
    }

    /// Record new container dimensions and refresh the derived bounds.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.recompute();
    }

    /// Re-derive row/column counts and corners from the current anchor and
    /// dimensions. Must run before any diff is taken against the corners.
    pub fn recompute(&mut self) {
        self.cols = span_count(self.size.width, self.tile_size, self.margin);
        self.rows = span_count(self.size.height, self.tile_size, self.margin);
        let margin = self.margin as i64;
        let origin = Coord::new(
            self.anchor.x.saturating_sub(margin),
            self.anchor.y.saturating_sub(margin),
        );
        self.corners = Corners::from_origin(origin, self.cols, self.rows);
        trace!(
            target: "tiler::viewport",
            anchor = %self.anchor,
            cols = self.cols,
            rows = self.rows,
            corners = %self.corners,
            "recompute"
        );
    }

    /// Pixel size of the frame that holds every materialized tile.
    pub fn frame_size(&self) -> Size {
        let tile = self.tile_size.unwrap_or(0) as f64;
        Size::new(self.cols as f64 * tile, self.rows as f64 * tile)
    }

    /// Frame position that puts the anchor tile at the container's top-left
    /// corner, with the margin ring hanging off the top and left edges.
    pub fn initial_frame_position(&self) -> Point {
        let tile = self.tile_size.unwrap_or(0) as f64;
        let inset = -(tile * self.margin as f64);
        Point::new(inset, inset)
    }
}

fn span_count(pixels: f64, tile_size: Option<u32>, margin: u32) -> u32 {
    match tile_size {
        Some(tile) if tile > 0 && pixels > 0.0 => {
            ((pixels / tile as f64).ceil() as u32).saturating_add(margin.saturating_mul(2))
        }
        _ => 0,
    }
}
