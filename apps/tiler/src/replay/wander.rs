//! Seeded random walk over the engine.
//!
//! Mostly drag-and-release moves with occasional resizes, jumps and
//! reloads. Invariants are checked after every step, so a walk doubles as a
//! soak test for arbitrary movement sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TilerConfig;
use crate::model::{Coord, Size};

use super::error::ReplayError;
use super::{Delivery, Replay, Step};

#[derive(Debug, Clone)]
pub struct WanderOptions {
    pub steps: usize,
    pub seed: u64,
    pub viewport: Size,
    /// Largest drag distance in pixels along either axis.
    pub max_drag: f64,
    pub delivery: Delivery,
}

impl Default for WanderOptions {
    fn default() -> Self {
        Self {
            steps: 500,
            seed: 0,
            viewport: Size::new(800.0, 600.0),
            max_drag: 400.0,
            delivery: Delivery::Immediate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WanderSummary {
    pub steps: usize,
    pub fetches: usize,
    pub fetched: usize,
    pub evicted: usize,
    pub peak_tiles: usize,
    pub final_anchor: Coord,
    pub final_tiles: usize,
}

pub fn wander(config: &TilerConfig, options: &WanderOptions) -> Result<WanderSummary, ReplayError> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut replay = Replay::new(config, options.viewport, options.delivery)?;
    let mut summary = WanderSummary::default();

    let first = replay.apply(0, &Step::Refresh)?;
    tally(&mut summary, &first);

    for index in 1..=options.steps {
        let step = next_step(&mut rng, &replay, options);
        let mut report = replay.apply(index, &step)?;
        tally(&mut summary, &report);
        if options.delivery == Delivery::Deferred && rng.gen_bool(0.5) {
            report = replay.apply(index, &Step::Deliver)?;
            tally(&mut summary, &report);
        }
        summary.steps = index;
    }

    summary.final_anchor = replay.tiler().anchor();
    summary.final_tiles = replay.tiler().tile_count();
    info!(
        target: "tiler::wander",
        seed = options.seed,
        steps = summary.steps,
        fetches = summary.fetches,
        peak_tiles = summary.peak_tiles,
        "wander_done"
    );
    Ok(summary)
}

fn tally(summary: &mut WanderSummary, report: &super::StepReport) {
    summary.fetches += report.requests.len();
    for request in &report.requests {
        summary.fetched += request.to_fetch.len();
        summary.evicted += request.removed.len();
    }
    summary.peak_tiles = summary.peak_tiles.max(report.tiles);
}

fn next_step(rng: &mut StdRng, replay: &Replay, options: &WanderOptions) -> Step {
    let tiler = replay.tiler();
    let roll: u32 = rng.gen_range(0..100);
    let step = match roll {
        0..80 => {
            let frame = tiler.frame_position();
            let max = options.max_drag.max(1.0);
            Step::DragStop {
                left: (frame.left + rng.gen_range(-max..=max)).round(),
                top: (frame.top + rng.gen_range(-max..=max)).round(),
            }
        }
        80..90 => {
            let base = options.viewport;
            Step::Resize {
                width: (base.width * rng.gen_range(0.25..=2.0)).round(),
                height: (base.height * rng.gen_range(0.25..=2.0)).round(),
            }
        }
        90..95 => {
            let anchor = tiler.anchor();
            Step::Jump {
                x: anchor.x + rng.gen_range(-20..=20),
                y: anchor.y + rng.gen_range(-20..=20),
            }
        }
        _ => Step::Reload,
    };
    debug!(target: "tiler::wander", roll, step = step.name(), "next_step");
    step
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(seed: u64, delivery: Delivery) -> WanderOptions {
        WanderOptions {
            steps: 200,
            seed,
            viewport: Size::new(640.0, 480.0),
            max_drag: 300.0,
            delivery,
        }
    }

    #[test_timeout::timeout]
    fn same_seed_same_walk() {
        let config = TilerConfig::with_tile_size(64);
        let a = wander(&config, &options(7, Delivery::Immediate)).unwrap();
        let b = wander(&config, &options(7, Delivery::Immediate)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.steps, 200);
        assert!(a.fetched > 0);
    }

    #[test_timeout::timeout]
    fn deferred_walk_keeps_invariants() {
        let config = TilerConfig::with_tile_size(50);
        let summary = wander(&config, &options(11, Delivery::Deferred)).unwrap();
        assert_eq!(summary.steps, 200);
    }
}
