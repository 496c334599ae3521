//! The windowing engine.
//!
//! [`Tiler`] owns the sparse tile grid and the viewport state. Every
//! transition (drag stop, resize, jump) follows the same pipeline:
//!
//! 1. resolve the new anchor and recompute the corners,
//! 2. diff the grid against the corners,
//! 3. detach and drop tiles that fell outside,
//! 4. shift retained tiles by the whole-tile delta,
//! 5. hand `(to_fetch, removed)` to the fetch handler.
//!
//! Tiles come back through [`Tiler::show`], either synchronously via the
//! [`TileSink`] passed to the handler or later from the host. Deliveries for
//! coordinates that have since left the corners are discarded, which is the
//! only protection needed against slow fetches racing viewport movement.

pub mod diff;
pub mod error;
pub mod fetch;

use tracing::{debug, trace};

use crate::adapter::Surface;
use crate::cache::SparseGrid;
use crate::config::TilerConfig;
use crate::model::{Coord, Corners, Point, Size, TileOffset};
use crate::telemetry::{self, PerfGuard};
use crate::viewport::{ViewportState, position};

pub use diff::TileDiff;
pub use error::InvariantError;
pub use fetch::{FetchHandler, FetchRequest, NoopFetch, TileSink};

/// A tile handle together with its current placement inside the frame.
#[derive(Debug)]
struct Placed<H> {
    handle: H,
    at: Point,
}

pub struct Tiler<S, F>
where
    S: Surface,
{
    viewport: ViewportState,
    tiles: SparseGrid<Placed<S::Tile>>,
    /// Last known absolute frame position.
    frame: Point,
    /// Frame position for the current anchor with no drag applied.
    initial_frame: Point,
    surface: S,
    fetcher: F,
}

impl<S, F> Tiler<S, F>
where
    S: Surface,
    F: FetchHandler<S::Tile>,
{
    pub fn new(config: &TilerConfig, viewport: Size, mut surface: S, fetcher: F) -> Self {
        let viewport = ViewportState::new(config, viewport);
        let initial_frame = viewport.initial_frame_position();
        surface.set_frame_position(initial_frame);
        surface.set_frame_size(viewport.frame_size());
        debug!(
            target: "tiler::engine",
            anchor = %viewport.anchor(),
            tile_size = ?viewport.tile_size(),
            margin = viewport.margin(),
            corners = %viewport.corners(),
            "tiler_created"
        );
        Self {
            viewport,
            tiles: SparseGrid::new(),
            frame: initial_frame,
            initial_frame,
            surface,
            fetcher,
        }
    }

    /// Current anchor: the logical coordinate of the top-left tile of the
    /// visible (pre-margin) area.
    pub fn anchor(&self) -> Coord {
        self.viewport.anchor()
    }

    pub fn corners(&self) -> Corners {
        self.viewport.corners()
    }

    pub fn cols_count(&self) -> u32 {
        self.viewport.cols_count()
    }

    pub fn rows_count(&self) -> u32 {
        self.viewport.rows_count()
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport.size()
    }

    pub fn frame_position(&self) -> Point {
        self.frame
    }

    pub fn frame_size(&self) -> Size {
        self.viewport.frame_size()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, coord: Coord) -> Option<&S::Tile> {
        self.tiles.get(coord).map(|placed| &placed.handle)
    }

    pub fn placement(&self, coord: Coord) -> Option<Point> {
        self.tiles.get(coord).map(|placed| placed.at)
    }

    /// Materialized tiles in row-major order.
    pub fn tiles(&self) -> Vec<(Coord, &S::Tile)> {
        self.tiles
            .entries()
            .into_iter()
            .map(|(coord, placed)| (coord, &placed.handle))
            .collect()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// The frame moved while a drag is still in progress. Nothing is
    /// recomputed until [`Tiler::drag_stop`] or [`Tiler::refresh`].
    pub fn drag_to(&mut self, at: Point) {
        self.frame = at;
        trace!(target: "tiler::engine", left = at.left, top = at.top, "drag_to");
    }

    pub fn drag_stop(&mut self, at: Point) {
        self.drag_to(at);
        self.refresh();
    }

    /// The viewport container changed size.
    pub fn resize(&mut self, size: Size) {
        self.viewport.resize(size);
        self.refresh();
    }

    /// Sync the materialized tiles with the frame's current position and the
    /// container size: evict what fell out, shift what stayed, fetch what is
    /// missing.
    pub fn refresh(&mut self) {
        let _perf = PerfGuard::new("tiler.refresh");
        let tile_size = self.viewport.tile_size().unwrap_or(0);
        let offset = position::tile_offset(self.initial_frame, self.frame, tile_size);

        self.viewport.retreat(offset);
        self.surface.set_frame_size(self.viewport.frame_size());

        let TileDiff { to_evict, to_fetch } = diff::diff(&self.tiles, &self.viewport.corners());
        if !to_evict.is_empty() {
            self.remove(&to_evict);
        }
        if !offset.is_zero() {
            self.frame = position::settle_frame(self.frame, offset, tile_size);
            self.surface.set_frame_position(self.frame);
            self.shift_tiles(offset, tile_size);
        }

        debug!(
            target: "tiler::engine",
            anchor = %self.viewport.anchor(),
            offset_x = offset.x,
            offset_y = offset.y,
            evicted = to_evict.len(),
            missing = to_fetch.len(),
            "refresh"
        );
        self.dispatch(to_fetch, to_evict);
    }

    /// Move the anchor straight to `anchor`, resetting any partial drag, then
    /// sync tiles exactly like [`Tiler::refresh`].
    pub fn jump_to(&mut self, anchor: Coord) {
        let _perf = PerfGuard::new("tiler.jump_to");
        let tile_size = self.viewport.tile_size().unwrap_or(0);
        let offset = TileOffset::between(self.viewport.anchor(), anchor);

        self.viewport.set_anchor(anchor);
        self.initial_frame = self.viewport.initial_frame_position();
        self.frame = self.initial_frame;
        self.surface.set_frame_position(self.frame);
        self.surface.set_frame_size(self.viewport.frame_size());

        let TileDiff { to_evict, to_fetch } = diff::diff(&self.tiles, &self.viewport.corners());
        if !to_evict.is_empty() {
            self.remove(&to_evict);
        }
        if !offset.is_zero() {
            self.shift_tiles(offset, tile_size);
        }

        debug!(
            target: "tiler::engine",
            anchor = %anchor,
            evicted = to_evict.len(),
            missing = to_fetch.len(),
            "jump_to"
        );
        self.dispatch(to_fetch, to_evict);
    }

    /// Ask for every tile in the current rectangle again, present or not.
    /// Nothing is evicted; tiles are replaced as fresh content arrives.
    pub fn reload(&mut self) {
        let _perf = PerfGuard::new("tiler.reload");
        let all = diff::all_coords(&self.viewport.corners());
        debug!(target: "tiler::engine", tiles = all.len(), "reload");
        self.dispatch(all, Vec::new());
    }

    /// Insert delivered tiles. Tiles outside the current corners are dropped;
    /// a tile landing on an occupied coordinate replaces (and detaches) the
    /// previous one. Returns how many tiles were inserted.
    pub fn show<I>(&mut self, tiles: I) -> usize
    where
        I: IntoIterator<Item = (Coord, S::Tile)>,
    {
        let _perf = PerfGuard::new("tiler.show");
        let corners = self.viewport.corners();
        let mut inserted = Vec::new();
        let mut discarded = 0usize;

        for (coord, handle) in tiles {
            if !corners.contains(coord) {
                discarded += 1;
                debug!(target: "tiler::engine", coord = %coord, corners = %corners, "show_discard_stale");
                continue;
            }
            if let Some(previous) = self.tiles.remove(coord) {
                self.surface.detach(previous.handle);
            }
            self.tiles.set(
                coord,
                Placed {
                    handle,
                    at: Point::ORIGIN,
                },
            );
            inserted.push(coord);
        }

        inserted.sort_unstable();
        inserted.dedup();
        if let Some(tile_size) = self.viewport.tile_size() {
            for &coord in &inserted {
                let at = position::placement(coord, &corners, tile_size);
                if let Some(placed) = self.tiles.get_mut(coord) {
                    placed.at = at;
                    self.surface.place(&mut placed.handle, at);
                }
            }
        }

        telemetry::record_gauge("tiler.tiles", self.tiles.len() as u64);
        trace!(
            target: "tiler::engine",
            inserted = inserted.len(),
            discarded,
            resident = self.tiles.len(),
            "show"
        );
        inserted.len()
    }

    /// Check that every tile lies within the corners and that no empty row
    /// survived.
    pub fn verify(&self) -> Result<(), InvariantError> {
        if let Some((y, _)) = self.tiles.row_lens().find(|(_, len)| *len == 0) {
            return Err(InvariantError::EmptyRow { y });
        }
        let corners = self.viewport.corners();
        match self.tiles.coords().into_iter().find(|coord| !corners.contains(*coord)) {
            Some(coord) => Err(InvariantError::TileOutsideCorners { coord, corners }),
            None => Ok(()),
        }
    }

    /// Detach and drop the tiles at `coords`.
    fn remove(&mut self, coords: &[Coord]) {
        for (_, placed) in self.tiles.remove_all(coords.iter().copied()) {
            self.surface.detach(placed.handle);
        }
    }

    fn shift_tiles(&mut self, offset: TileOffset, tile_size: u32) {
        let delta = position::shift_delta(offset, tile_size);
        for placed in self.tiles.values_mut() {
            placed.at += delta;
            self.surface.place(&mut placed.handle, placed.at);
        }
    }

    fn dispatch(&mut self, to_fetch: Vec<Coord>, removed: Vec<Coord>) {
        let request = FetchRequest::new(to_fetch, removed);
        if request.is_empty() {
            trace!(target: "tiler::engine", "fetch_skipped");
            return;
        }
        let mut sink = TileSink::new();
        self.fetcher.fetch(&request, &mut sink);
        if !sink.is_empty() {
            self.show(sink.into_tiles());
        }
    }
}
