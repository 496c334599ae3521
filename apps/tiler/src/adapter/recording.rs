use crate::model::{Point, Size};

use super::Surface;

/// Tile handle for the in-memory surface: a label plus wherever it was last
/// placed.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTile {
    pub label: String,
    pub position: Option<Point>,
}

impl RecordedTile {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            position: None,
        }
    }
}

/// Surface that keeps a log of everything the engine asked it to do instead
/// of drawing. Used by the replay driver and by tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    frame_size: Size,
    frame_position: Point,
    detached: Vec<String>,
    placements: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    pub fn frame_position(&self) -> Point {
        self.frame_position
    }

    /// Labels of detached tiles, oldest first.
    pub fn detached(&self) -> &[String] {
        &self.detached
    }

    pub fn take_detached(&mut self) -> Vec<String> {
        std::mem::take(&mut self.detached)
    }

    /// Total number of `place` calls received.
    pub fn placements(&self) -> usize {
        self.placements
    }
}

impl Surface for RecordingSurface {
    type Tile = RecordedTile;

    fn place(&mut self, tile: &mut RecordedTile, at: Point) {
        tile.position = Some(at);
        self.placements += 1;
    }

    fn detach(&mut self, tile: RecordedTile) {
        self.detached.push(tile.label);
    }

    fn set_frame_size(&mut self, size: Size) {
        self.frame_size = size;
    }

    fn set_frame_position(&mut self, at: Point) {
        self.frame_position = at;
    }
}
