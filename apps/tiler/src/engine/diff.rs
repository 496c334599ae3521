use crate::cache::SparseGrid;
use crate::model::{Coord, Corners};

/// Outcome of comparing the grid contents with the materialization rectangle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileDiff {
    /// Present tiles outside the rectangle, row-major.
    pub to_evict: Vec<Coord>,
    /// Rectangle coordinates with no tile, row-major.
    pub to_fetch: Vec<Coord>,
}

impl TileDiff {
    pub fn is_empty(&self) -> bool {
        self.to_evict.is_empty() && self.to_fetch.is_empty()
    }
}

pub fn diff<T>(grid: &SparseGrid<T>, corners: &Corners) -> TileDiff {
    TileDiff {
        to_evict: hidden_coords(grid, corners),
        to_fetch: missing_coords(grid, corners),
    }
}

/// Present coordinates that fall outside `corners`.
pub fn hidden_coords<T>(grid: &SparseGrid<T>, corners: &Corners) -> Vec<Coord> {
    let mut hidden = Vec::new();
    grid.each(|coord, _| {
        if !corners.contains(coord) {
            hidden.push(coord);
        }
    });
    hidden
}

/// Coordinates inside `corners` with no entry in the grid.
pub fn missing_coords<T>(grid: &SparseGrid<T>, corners: &Corners) -> Vec<Coord> {
    corners
        .coords()
        .filter(|coord| !grid.contains(*coord))
        .collect()
}

/// Every coordinate inside `corners`, regardless of presence.
pub fn all_coords(corners: &Corners) -> Vec<Coord> {
    corners.coords().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i64, y: i64) -> Coord {
        Coord::new(x, y)
    }

    fn filled(corners: &Corners) -> SparseGrid<()> {
        let mut grid = SparseGrid::new();
        for coord in corners.coords() {
            grid.set(coord, ());
        }
        grid
    }

    #[test_timeout::timeout]
    fn empty_grid_fetches_full_rectangle() {
        let grid: SparseGrid<()> = SparseGrid::new();
        let corners = Corners::new(-1, -1, 1, 1);
        let diff = diff(&grid, &corners);
        assert!(diff.to_evict.is_empty());
        assert_eq!(diff.to_fetch, all_coords(&corners));
        assert_eq!(diff.to_fetch.len(), 9);
    }

    #[test_timeout::timeout]
    fn panning_down_right_evicts_trailing_edge() {
        let grid = filled(&Corners::new(-1, -1, 1, 1));
        let diff = diff(&grid, &Corners::new(-2, -2, 0, 0));
        assert_eq!(
            diff.to_evict,
            vec![c(1, -1), c(1, 0), c(-1, 1), c(0, 1), c(1, 1)]
        );
        assert_eq!(
            diff.to_fetch,
            vec![c(-2, -2), c(-1, -2), c(0, -2), c(-2, -1), c(-2, 0)]
        );
    }

    #[test_timeout::timeout]
    fn growing_rectangle_fetches_border_ring_only() {
        let grid = filled(&Corners::new(-1, -1, 1, 1));
        let diff = diff(&grid, &Corners::new(-1, -1, 2, 2));
        assert!(diff.to_evict.is_empty());
        assert_eq!(
            diff.to_fetch,
            vec![c(2, -1), c(2, 0), c(2, 1), c(-1, 2), c(0, 2), c(1, 2), c(2, 2)]
        );
    }

    #[test_timeout::timeout]
    fn settled_grid_has_nothing_to_do() {
        let corners = Corners::new(3, 3, 5, 4);
        let grid = filled(&corners);
        assert!(diff(&grid, &corners).is_empty());
    }

    #[test_timeout::timeout]
    fn empty_rectangle_evicts_everything() {
        let grid = filled(&Corners::new(0, 0, 1, 0));
        let diff = diff(&grid, &Corners::new(-2, -2, -3, -3));
        assert_eq!(diff.to_evict, vec![c(0, 0), c(1, 0)]);
        assert!(diff.to_fetch.is_empty());
    }
}
