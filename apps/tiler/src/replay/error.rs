use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::InvariantError;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("invariant broken after step {step}: {source}")]
    Invariant {
        step: usize,
        #[source]
        source: InvariantError,
    },
    #[error("failed to start tile loader: {0}")]
    LoaderSpawn(io::Error),
    #[error("tile loader did not answer {pending} pending request(s)")]
    LoaderStalled { pending: usize },
    #[error("tile loader exited unexpectedly")]
    LoaderGone,
}
