use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
#[cfg(test)]
use std::sync::{LazyLock, Mutex};

pub const DEFAULT_MARGIN: u32 = 2;

/// Held by every test that reads or writes `TILER_*` variables.
#[cfg(test)]
pub(crate) static ENV_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Engine configuration, fixed for the lifetime of a `Tiler`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilerConfig {
    /// Edge length of a square tile in pixels. Without it the materialized
    /// rectangle is empty and nothing is ever fetched.
    pub tile_size: Option<u32>,
    /// Extra rings of tiles kept around the visible area.
    pub margin: u32,
    /// Initial anchor column.
    pub x: i64,
    /// Initial anchor row.
    pub y: i64,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            tile_size: None,
            margin: DEFAULT_MARGIN,
            x: 0,
            y: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },
    #[error("tile_size must be greater than zero")]
    ZeroTileSize,
    #[error("margin {0} does not fit a column count")]
    MarginTooLarge(u32),
}

impl TilerConfig {
    pub fn with_tile_size(tile_size: u32) -> Self {
        Self {
            tile_size: Some(tile_size),
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: TilerConfig = toml::from_str(source)?;
        config.validate()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Overlay `TILER_TILE_SIZE`, `TILER_MARGIN`, `TILER_X` and `TILER_Y`
    /// when they are set.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(tile_size) = env_number::<u32>("TILER_TILE_SIZE")? {
            self.tile_size = Some(tile_size);
        }
        if let Some(margin) = env_number::<u32>("TILER_MARGIN")? {
            self.margin = margin;
        }
        if let Some(x) = env_number::<i64>("TILER_X")? {
            self.x = x;
        }
        if let Some(y) = env_number::<i64>("TILER_Y")? {
            self.y = y;
        }
        self.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.tile_size == Some(0) {
            return Err(ConfigError::ZeroTileSize);
        }
        // Both sides of the margin ring must fit in a u32 column count.
        if self.margin.checked_mul(2).is_none() {
            return Err(ConfigError::MarginTooLarge(self.margin));
        }
        Ok(self)
    }
}

fn env_number<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        Err(_) => Ok(None),
    }
}
