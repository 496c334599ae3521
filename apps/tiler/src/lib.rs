//! A windowed view over an unbounded, sparsely populated grid of square
//! tiles.
//!
//! The host owns the tiles and a draggable frame; [`Tiler`] decides which
//! coordinates must be materialized, which must be dropped, and where each
//! retained tile sits inside the frame.

pub mod adapter;
pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod model;
pub mod replay;
pub mod telemetry;
pub mod viewport;

pub use adapter::Surface;
pub use config::TilerConfig;
pub use engine::{FetchHandler, FetchRequest, TileSink, Tiler};
pub use model::{Coord, Corners, Point, Size};
