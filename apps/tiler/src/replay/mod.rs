//! Scripted and randomized drivers for the engine.
//!
//! A [`Replay`] wires a [`Tiler`] to a [`RecordingSurface`] and a
//! [`ReplayFetch`] handler, applies [`Step`]s one at a time, and reports what
//! the engine asked for after each of them.

pub mod error;
pub mod loader;
pub mod script;
pub mod wander;

use serde::Serialize;
use tracing::{debug, info};

use crate::adapter::{RecordedTile, RecordingSurface};
use crate::config::TilerConfig;
use crate::engine::{FetchRequest, Tiler};
use crate::model::{Coord, Corners, Point, Size};

pub use error::ReplayError;
pub use loader::{Loader, ReplayFetch};
pub use script::{Script, Step};
pub use wander::{WanderOptions, WanderSummary, wander};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Tiles are returned from inside the fetch callback.
    #[default]
    Immediate,
    /// Tiles are produced on a loader thread and only shown on `deliver`.
    Deferred,
}

/// Engine state after one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub requests: Vec<FetchRequest>,
    pub detached: Vec<String>,
    pub delivered: usize,
    pub anchor: Coord,
    pub corners: Corners,
    pub frame: Point,
    pub tiles: usize,
}

pub struct Replay {
    tiler: Tiler<RecordingSurface, ReplayFetch>,
    loader: Option<Loader>,
    delivery: Delivery,
}

impl Replay {
    pub fn new(config: &TilerConfig, viewport: Size, delivery: Delivery) -> Result<Self, ReplayError> {
        let config = config.clone().validate()?;
        let (fetch, loader) = match delivery {
            Delivery::Immediate => (ReplayFetch::immediate(), None),
            Delivery::Deferred => {
                let (loader, sender) = Loader::spawn()?;
                (ReplayFetch::deferred(sender), Some(loader))
            }
        };
        let tiler = Tiler::new(&config, viewport, RecordingSurface::default(), fetch);
        debug!(target: "tiler::replay", ?delivery, corners = %tiler.corners(), "replay_ready");
        Ok(Self {
            tiler,
            loader,
            delivery,
        })
    }

    pub fn tiler(&self) -> &Tiler<RecordingSurface, ReplayFetch> {
        &self.tiler
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Apply one step and check the engine's invariants afterwards.
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<StepReport, ReplayError> {
        let mut delivered = 0;
        match step {
            Step::Refresh => self.tiler.refresh(),
            Step::Drag { left, top } => self.tiler.drag_to(Point::new(*left, *top)),
            Step::DragStop { left, top } => self.tiler.drag_stop(Point::new(*left, *top)),
            Step::Resize { width, height } => self.tiler.resize(Size::new(*width, *height)),
            Step::Jump { x, y } => self.tiler.jump_to(Coord::new(*x, *y)),
            Step::Reload => self.tiler.reload(),
            Step::Deliver => delivered = self.deliver()?,
        }

        self.tiler
            .verify()
            .map_err(|source| ReplayError::Invariant { step: index, source })?;

        let report = StepReport {
            index,
            step: step.clone(),
            requests: self.tiler.fetcher_mut().take_requests(),
            detached: self.tiler.surface_mut().take_detached(),
            delivered,
            anchor: self.tiler.anchor(),
            corners: self.tiler.corners(),
            frame: self.tiler.frame_position(),
            tiles: self.tiler.tile_count(),
        };
        debug!(
            target: "tiler::replay",
            index,
            step = step.name(),
            requests = report.requests.len(),
            delivered,
            tiles = report.tiles,
            "step_applied"
        );
        Ok(report)
    }

    /// Collect every outstanding loader batch and show it. Batches for
    /// coordinates that scrolled away in the meantime are discarded by the
    /// engine.
    fn deliver(&mut self) -> Result<usize, ReplayError> {
        let Some(loader) = &self.loader else {
            return Ok(0);
        };
        if self.tiler.fetcher().loader_lost() {
            return Err(ReplayError::LoaderGone);
        }
        let pending = self.tiler.fetcher_mut().take_pending();
        let mut shown = 0;
        for batch in loader.collect(pending)? {
            shown += self.tiler.show(batch);
        }
        Ok(shown)
    }

    /// Deliver anything still in flight and return the final tile labels in
    /// row-major order.
    pub fn finish(mut self) -> Result<Vec<(Coord, String)>, ReplayError> {
        self.deliver()?;
        Ok(self
            .tiler
            .tiles()
            .into_iter()
            .map(|(coord, tile): (Coord, &RecordedTile)| (coord, tile.label.clone()))
            .collect())
    }
}

/// Run every step of `script`, returning one report per step.
pub fn run_script(script: &Script, delivery: Delivery) -> Result<Vec<StepReport>, ReplayError> {
    let mut replay = Replay::new(&script.tiler, script.viewport, delivery)?;
    let reports = script
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| replay.apply(index, step))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        target: "tiler::replay",
        steps = reports.len(),
        fetches = replay.tiler().fetcher().total_requests(),
        tiles = replay.tiler().tile_count(),
        "script_done"
    );
    Ok(reports)
}
