//! Background tile source for deferred delivery.
//!
//! Requests go out over one channel, finished batches come back over
//! another. The engine never waits on the loader; the replay driver decides
//! when to collect batches and feed them to `Tiler::show`.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use tracing::{debug, trace, warn};

use crate::adapter::RecordedTile;
use crate::engine::{FetchHandler, FetchRequest, TileSink};
use crate::model::Coord;

use super::error::ReplayError;

pub type TileBatch = Vec<(Coord, RecordedTile)>;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Label for a synthesized tile: its coordinate plus the request that
/// produced it, so a reloaded tile is distinguishable from the one it replaced.
pub fn tile_label(coord: Coord, generation: u64) -> String {
    format!("{}:{}@{}", coord.x, coord.y, generation)
}

pub fn synthesize(request: &FetchRequest, generation: u64) -> TileBatch {
    request
        .to_fetch
        .iter()
        .map(|&coord| (coord, RecordedTile::new(tile_label(coord, generation))))
        .collect()
}

/// Receiving side of the loader thread.
pub struct Loader {
    responses: Receiver<TileBatch>,
}

impl Loader {
    /// Start the loader thread. Returns the loader and the sender the fetch
    /// handler submits requests through; the thread exits once every sender
    /// is dropped.
    pub fn spawn() -> Result<(Self, Sender<(u64, FetchRequest)>), ReplayError> {
        let (request_tx, request_rx) = unbounded::<(u64, FetchRequest)>();
        let (response_tx, response_rx) = unbounded();
        thread::Builder::new()
            .name("tiler-loader".into())
            .spawn(move || {
                for (generation, request) in request_rx {
                    let batch = synthesize(&request, generation);
                    trace!(target: "tiler::loader", generation, tiles = batch.len(), "loaded");
                    if response_tx.send(batch).is_err() {
                        break;
                    }
                }
                debug!(target: "tiler::loader", "loader_exit");
            })
            .map_err(ReplayError::LoaderSpawn)?;
        Ok((
            Self {
                responses: response_rx,
            },
            request_tx,
        ))
    }

    /// Block until `pending` batches have arrived.
    pub fn collect(&self, pending: usize) -> Result<Vec<TileBatch>, ReplayError> {
        let mut batches = Vec::with_capacity(pending);
        for received in 0..pending {
            match self.responses.recv_timeout(DELIVERY_TIMEOUT) {
                Ok(batch) => batches.push(batch),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(ReplayError::LoaderStalled {
                        pending: pending - received,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => return Err(ReplayError::LoaderGone),
            }
        }
        Ok(batches)
    }
}

/// Fetch handler used by the replay driver.
///
/// Every request is logged. Without a loader, tiles are produced on the spot
/// and returned through the sink; with one, requests are queued and
/// `pending` counts how many batches are still in flight. A request the
/// loader thread can no longer accept marks the handler as having lost it.
pub struct ReplayFetch {
    requests: Vec<FetchRequest>,
    loader: Option<Sender<(u64, FetchRequest)>>,
    pending: usize,
    generation: u64,
    loader_lost: bool,
}

impl ReplayFetch {
    pub fn immediate() -> Self {
        Self {
            requests: Vec::new(),
            loader: None,
            pending: 0,
            generation: 0,
            loader_lost: false,
        }
    }

    pub fn deferred(loader: Sender<(u64, FetchRequest)>) -> Self {
        Self {
            loader: Some(loader),
            ..Self::immediate()
        }
    }

    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn take_pending(&mut self) -> usize {
        std::mem::take(&mut self.pending)
    }

    pub fn total_requests(&self) -> u64 {
        self.generation
    }

    pub fn loader_lost(&self) -> bool {
        self.loader_lost
    }
}

impl FetchHandler<RecordedTile> for ReplayFetch {
    fn fetch(&mut self, request: &FetchRequest, sink: &mut TileSink<RecordedTile>) {
        self.generation += 1;
        self.requests.push(request.clone());
        if request.to_fetch.is_empty() {
            return;
        }
        match &self.loader {
            Some(loader) => {
                if loader.send((self.generation, request.clone())).is_ok() {
                    self.pending += 1;
                } else {
                    warn!(
                        target: "tiler::loader",
                        generation = self.generation,
                        tiles = request.to_fetch.len(),
                        "loader_gone"
                    );
                    self.loader_lost = true;
                }
            }
            None => sink.extend(synthesize(request, self.generation)),
        }
    }
}
