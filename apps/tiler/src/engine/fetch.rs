use serde::Serialize;

use crate::model::Coord;

/// Coordinates the host should load, plus the ones that were just evicted so
/// it can cancel or forget pending work for them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub to_fetch: Vec<Coord>,
    pub removed: Vec<Coord>,
}

impl FetchRequest {
    pub fn new(to_fetch: Vec<Coord>, removed: Vec<Coord>) -> Self {
        Self { to_fetch, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.to_fetch.is_empty() && self.removed.is_empty()
    }
}

/// Tiles handed back synchronously from inside a fetch handler.
///
/// Whatever the handler pushes here is shown as soon as the handler returns,
/// before the operation that triggered the fetch completes. Handlers that load
/// asynchronously leave the sink empty and call `Tiler::show` later.
#[derive(Debug)]
pub struct TileSink<T> {
    tiles: Vec<(Coord, T)>,
}

impl<T> Default for TileSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TileSink<T> {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    pub fn push(&mut self, coord: Coord, tile: T) {
        self.tiles.push((coord, tile));
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub(crate) fn into_tiles(self) -> Vec<(Coord, T)> {
        self.tiles
    }
}

impl<T> Extend<(Coord, T)> for TileSink<T> {
    fn extend<I: IntoIterator<Item = (Coord, T)>>(&mut self, iter: I) {
        self.tiles.extend(iter);
    }
}

/// Receives fetch decisions from the engine.
///
/// Invoked at most once per engine operation, and only when there is
/// something to fetch or something was removed.
pub trait FetchHandler<T> {
    fn fetch(&mut self, request: &FetchRequest, sink: &mut TileSink<T>);
}

impl<T, F> FetchHandler<T> for F
where
    F: FnMut(&FetchRequest, &mut TileSink<T>),
{
    fn fetch(&mut self, request: &FetchRequest, sink: &mut TileSink<T>) {
        self(request, sink)
    }
}

/// Handler that ignores every request; useful when tiles are pushed by other
/// means.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFetch;

impl<T> FetchHandler<T> for NoopFetch {
    fn fetch(&mut self, _request: &FetchRequest, _sink: &mut TileSink<T>) {}
}
