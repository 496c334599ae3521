use std::collections::HashMap;

use tracing::trace;

use crate::model::Coord;

#[derive(Debug)]
struct Row<T> {
    cells: HashMap<i64, T>,
}

impl<T> Row<T> {
    fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.cells.len()
    }

    /// Column keys in ascending order.
    fn sorted_cols(&self) -> Vec<i64> {
        let mut cols: Vec<i64> = self.cells.keys().copied().collect();
        cols.sort_unstable();
        cols
    }
}

/// Two-level sparse map from tile coordinates to entries.
///
/// Rows only exist while they hold at least one entry; every removal path
/// prunes a row the moment it becomes empty.
#[derive(Debug)]
pub struct SparseGrid<T> {
    rows: HashMap<i64, Row<T>>,
    len: usize,
}

impl<T> Default for SparseGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseGrid<T> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            len: 0,
        }
    }

    /// Number of entries across all rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of entries in row `y`; zero when the row does not exist.
    pub fn row_len(&self, y: i64) -> usize {
        self.rows.get(&y).map_or(0, Row::count)
    }

    /// Insert or replace the entry at `coord`, returning the replaced entry.
    pub fn set(&mut self, coord: Coord, entry: T) -> Option<T> {
        let row = self.rows.entry(coord.y).or_insert_with(Row::new);
        let previous = row.cells.insert(coord.x, entry);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        self.rows.get(&coord.y)?.cells.get(&coord.x)
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        self.rows.get_mut(&coord.y)?.cells.get_mut(&coord.x)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Remove the entry at `coord`. Removing the last entry of a row drops the
    /// row as well. Absent coordinates are a no-op.
    pub fn remove(&mut self, coord: Coord) -> Option<T> {
        let row = self.rows.get_mut(&coord.y)?;
        let removed = row.cells.remove(&coord.x)?;
        self.len -= 1;
        if row.count() == 0 {
            self.rows.remove(&coord.y);
            trace!(target: "tiler::grid", y = coord.y, "row_pruned");
        }
        Some(removed)
    }

    /// Remove a batch of coordinates, returning the entries that were present
    /// in input order. Each removal prunes its own row, so several
    /// coordinates sharing a row never leave an empty row behind.
    pub fn remove_all<I>(&mut self, coords: I) -> Vec<(Coord, T)>
    where
        I: IntoIterator<Item = Coord>,
    {
        coords
            .into_iter()
            .filter_map(|coord| self.remove(coord).map(|entry| (coord, entry)))
            .collect()
    }

    /// Remove an entire row, returning its entries in ascending `x` order.
    pub fn remove_row(&mut self, y: i64) -> Vec<(Coord, T)> {
        let Some(row) = self.rows.remove(&y) else {
            return Vec::new();
        };
        self.len -= row.count();
        let mut entries: Vec<(Coord, T)> = row
            .cells
            .into_iter()
            .map(|(x, entry)| (Coord::new(x, y), entry))
            .collect();
        entries.sort_unstable_by_key(|(coord, _)| coord.x);
        entries
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.len = 0;
    }

    fn sorted_rows(&self) -> Vec<i64> {
        let mut ys: Vec<i64> = self.rows.keys().copied().collect();
        ys.sort_unstable();
        ys
    }

    /// Visit every entry with its coordinate, ascending `y` then ascending `x`.
    pub fn each<F>(&self, mut visitor: F)
    where
        F: FnMut(Coord, &T),
    {
        for y in self.sorted_rows() {
            let row = &self.rows[&y];
            for x in row.sorted_cols() {
                visitor(Coord::new(x, y), &row.cells[&x]);
            }
        }
    }

    /// All entries with their coordinates in row-major order.
    pub fn entries(&self) -> Vec<(Coord, &T)> {
        let mut out = Vec::with_capacity(self.len);
        for y in self.sorted_rows() {
            let row = &self.rows[&y];
            for x in row.sorted_cols() {
                out.push((Coord::new(x, y), &row.cells[&x]));
            }
        }
        out
    }

    /// All present coordinates in row-major order.
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.len);
        self.each(|coord, _| out.push(coord));
        out
    }

    /// Mutable access to every entry in unspecified order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut().flat_map(|row| row.cells.values_mut())
    }

    /// Present entries among the eight cells surrounding `coord`, scanned
    /// top row left to right, then the middle row, then the bottom row.
    pub fn neighbors(&self, coord: Coord) -> Vec<(Coord, &T)> {
        const RING: [(i64, i64); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        RING.iter()
            .filter_map(|&(dx, dy)| {
                Some(Coord::new(coord.x.checked_add(dx)?, coord.y.checked_add(dy)?))
            })
            .filter_map(|near| self.get(near).map(|entry| (near, entry)))
            .collect()
    }

    /// Entry counts per row, for diagnostics.
    pub fn row_lens(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.rows.iter().map(|(y, row)| (*y, row.count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i64, y: i64) -> Coord {
        Coord::new(x, y)
    }

    #[test_timeout::timeout]
    fn set_creates_rows_and_replaces_in_place() {
        let mut grid = SparseGrid::new();
        assert_eq!(grid.set(c(1, 2), 'a'), None);
        assert_eq!(grid.set(c(1, 2), 'b'), Some('a'));
        assert_eq!(grid.set(c(-4, 2), 'c'), None);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.row_len(2), 2);
        assert_eq!(grid.get(c(1, 2)), Some(&'b'));
    }

    #[test_timeout::timeout]
    fn lookups_of_unknown_coordinates_are_absent() {
        let mut grid: SparseGrid<u8> = SparseGrid::new();
        assert_eq!(grid.get(c(0, 0)), None);
        assert_eq!(grid.get_mut(c(7, -7)), None);
        assert!(!grid.contains(c(i64::MAX, i64::MIN)));
        assert_eq!(grid.remove(c(0, 0)), None);
        assert_eq!(grid.row_len(99), 0);
    }

    #[test_timeout::timeout]
    fn removing_last_entry_prunes_row() {
        let mut grid = SparseGrid::new();
        grid.set(c(0, 5), 1);
        grid.set(c(1, 5), 2);
        assert_eq!(grid.remove(c(0, 5)), Some(1));
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.remove(c(1, 5)), Some(2));
        assert_eq!(grid.row_count(), 0);
        assert!(grid.is_empty());
    }

    #[test_timeout::timeout]
    fn batch_removal_leaves_no_empty_rows() {
        let mut grid = SparseGrid::new();
        for x in -2..=2 {
            grid.set(c(x, 0), x);
            grid.set(c(x, 1), x * 10);
        }
        let removed = grid.remove_all([c(-2, 0), c(-1, 0), c(0, 0), c(1, 0), c(2, 0), c(9, 9)]);
        assert_eq!(removed.len(), 5);
        assert_eq!(removed[0], (c(-2, 0), -2));
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.row_len(0), 0);
        assert_eq!(grid.row_len(1), 5);
        assert!(grid.row_lens().all(|(_, len)| len > 0));
    }

    #[test_timeout::timeout]
    fn enumeration_is_row_major_regardless_of_insert_order() {
        let mut grid = SparseGrid::new();
        let inserts = [c(1, 1), c(-1, -1), c(0, 1), c(1, -1), c(-1, 1), c(0, -1)];
        for (idx, coord) in inserts.iter().enumerate() {
            grid.set(*coord, idx);
        }
        assert_eq!(
            grid.coords(),
            vec![c(-1, -1), c(0, -1), c(1, -1), c(-1, 1), c(0, 1), c(1, 1)]
        );
        let mut visited = Vec::new();
        grid.each(|coord, value| visited.push((coord, *value)));
        assert_eq!(visited[0], (c(-1, -1), 1));
        assert_eq!(visited[5], (c(1, 1), 0));
        assert_eq!(grid.entries().len(), 6);
    }

    #[test_timeout::timeout]
    fn remove_row_drops_every_cell_in_order() {
        let mut grid = SparseGrid::new();
        grid.set(c(3, 4), 'c');
        grid.set(c(-3, 4), 'a');
        grid.set(c(0, 4), 'b');
        grid.set(c(0, 5), 'z');
        let row = grid.remove_row(4);
        assert_eq!(row, vec![(c(-3, 4), 'a'), (c(0, 4), 'b'), (c(3, 4), 'c')]);
        assert_eq!(grid.len(), 1);
        assert!(grid.remove_row(4).is_empty());
    }

    #[test_timeout::timeout]
    fn neighbors_scan_surrounding_ring() {
        let mut grid = SparseGrid::new();
        for coord in [c(0, 0), c(1, 0), c(-1, -1), c(0, 1), c(2, 2), c(1, 1)] {
            grid.set(coord, coord.x * 10 + coord.y);
        }
        let near: Vec<Coord> = grid.neighbors(c(0, 0)).into_iter().map(|(k, _)| k).collect();
        assert_eq!(near, vec![c(-1, -1), c(1, 0), c(0, 1), c(1, 1)]);
    }

    #[test_timeout::timeout]
    fn neighbors_skip_ring_beyond_coordinate_space() {
        let mut grid = SparseGrid::new();
        let corner = c(i64::MAX, i64::MIN);
        grid.set(corner, 'a');
        grid.set(c(i64::MAX - 1, i64::MIN), 'b');
        grid.set(c(i64::MAX, i64::MIN + 1), 'c');
        let near: Vec<char> = grid.neighbors(corner).into_iter().map(|(_, v)| *v).collect();
        assert_eq!(near, vec!['b', 'c']);
    }

    #[test_timeout::timeout]
    fn values_mut_reaches_every_entry() {
        let mut grid = SparseGrid::new();
        grid.set(c(0, 0), 1);
        grid.set(c(5, 9), 2);
        for value in grid.values_mut() {
            *value *= 100;
        }
        assert_eq!(grid.get(c(0, 0)), Some(&100));
        assert_eq!(grid.get(c(5, 9)), Some(&200));
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.row_count(), 0);
    }
}
