pub mod app;
pub mod error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::telemetry::logging::{LogConfig, LogLevel};

pub use app::run;
pub use error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "tiler",
    about = "Drive a windowed tile grid from scripts or random walks",
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("TILER_BUILD_TIMESTAMP"))
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        value_enum,
        global = true,
        env = "TILER_LOG_LEVEL",
        default_value_t = LogLevel::Warn,
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        global = true,
        env = "TILER_LOG_FILE",
        help = "Write structured logs to the specified file"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a TOML script of viewport events and print what the engine did
    Replay(ReplayArgs),
    /// Run a seeded random walk and check invariants after every step
    Wander(WanderArgs),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    #[arg(value_name = "SCRIPT", help = "Path to the replay script")]
    pub script: PathBuf,

    #[arg(
        long,
        help = "Load tiles on a background thread and show them only on `deliver` steps"
    )]
    pub deferred: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct WanderArgs {
    #[arg(long, default_value_t = 500)]
    pub steps: usize,

    #[arg(long, env = "TILER_SEED", default_value_t = 0)]
    pub seed: u64,

    #[arg(long, default_value_t = 800.0, help = "Viewport width in pixels")]
    pub width: f64,

    #[arg(long, default_value_t = 600.0, help = "Viewport height in pixels")]
    pub height: f64,

    #[arg(long = "max-drag", default_value_t = 400.0)]
    pub max_drag: f64,

    #[arg(
        long = "tile-size",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Tile edge in pixels; overrides the config file and TILER_TILE_SIZE [fallback: 64]"
    )]
    pub tile_size: Option<u32>,

    #[arg(long)]
    pub deferred: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Engine config file; TILER_* variables override it"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
