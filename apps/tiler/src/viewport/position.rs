//! Conversions between frame pixels and tile coordinates.
//!
//! The frame is the surface that carries every materialized tile. Dragging it
//! moves all tiles at once; only whole-tile crossings change which tiles are
//! materialized, the sub-tile remainder stays purely visual.

use crate::model::{Coord, Corners, Point, TileOffset};

/// Whole tiles the frame has travelled from `initial` to `current`.
///
/// Truncates toward zero: a partial drag in either direction contributes
/// nothing until it crosses a full tile.
pub fn tile_offset(initial: Point, current: Point, tile_size: u32) -> TileOffset {
    if tile_size == 0 {
        return TileOffset::ZERO;
    }
    let tile = tile_size as f64;
    TileOffset::new(
        ((current.left - initial.left) / tile).trunc() as i64,
        ((current.top - initial.top) / tile).trunc() as i64,
    )
}

/// Pixel delta covering `offset` whole tiles.
pub fn shift_delta(offset: TileOffset, tile_size: u32) -> Point {
    let tile = tile_size as f64;
    Point::new(offset.x as f64 * tile, offset.y as f64 * tile)
}

/// Frame position after consuming `offset` whole tiles of drag, keeping the
/// sub-tile remainder in place.
pub fn settle_frame(current: Point, offset: TileOffset, tile_size: u32) -> Point {
    current - shift_delta(offset, tile_size)
}

/// Placement of the tile at `coord` relative to the frame origin.
pub fn placement(coord: Coord, corners: &Corners, tile_size: u32) -> Point {
    let tile = tile_size as f64;
    Point::new(
        (coord.x - corners.x1) as f64 * tile,
        (coord.y - corners.y1) as f64 * tile,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: Point = Point::new(-200.0, -200.0);

    #[test_timeout::timeout]
    fn partial_drags_truncate_toward_zero() {
        assert_eq!(
            tile_offset(INITIAL, Point::new(-150.0, -250.0), 100),
            TileOffset::ZERO
        );
        assert_eq!(
            tile_offset(INITIAL, Point::new(-100.0, -300.0), 100),
            TileOffset::new(1, -1)
        );
        assert_eq!(
            tile_offset(INITIAL, Point::new(-320.0, -99.0), 100),
            TileOffset::new(-1, 1)
        );
    }

    #[test_timeout::timeout]
    fn settled_frame_keeps_remainder() {
        let current = Point::new(-320.0, -250.0);
        let offset = tile_offset(INITIAL, current, 100);
        assert_eq!(offset, TileOffset::new(-1, 0));
        assert_eq!(settle_frame(current, offset, 100), Point::new(-220.0, -250.0));
    }

    #[test_timeout::timeout]
    fn far_drags_resolve_many_tiles() {
        let initial = Point::new(-100.0, -100.0);
        let current = Point::new(-1000.0, -1000.0);
        let offset = tile_offset(initial, current, 100);
        assert_eq!(offset, TileOffset::new(-9, -9));
        assert_eq!(settle_frame(current, offset, 100), initial);
    }

    #[test_timeout::timeout]
    fn placement_is_relative_to_top_left_corner() {
        let corners = Corners::new(-2, -2, 0, 0);
        assert_eq!(placement(Coord::new(-2, -2), &corners, 100), Point::ORIGIN);
        assert_eq!(
            placement(Coord::new(-1, 0), &corners, 100),
            Point::new(100.0, 200.0)
        );
    }

    #[test_timeout::timeout]
    fn shifting_matches_recomputed_placement() {
        let before = Corners::new(-1, -1, 1, 1);
        let offset = TileOffset::new(1, 1);
        let after = Corners::new(before.x1 - 1, before.y1 - 1, before.x2 - 1, before.y2 - 1);
        let coord = Coord::new(0, -1);
        let shifted = placement(coord, &before, 64) + shift_delta(offset, 64);
        assert_eq!(shifted, placement(coord, &after, 64));
    }
}
