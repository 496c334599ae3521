use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::TilerConfig;
use crate::model::Size;

use super::error::ReplayError;

/// A recorded sequence of viewport events, loaded from TOML:
///
/// ```toml
/// [tiler]
/// tile_size = 100
/// margin = 1
///
/// [viewport]
/// width = 100
/// height = 100
///
/// [[steps]]
/// action = "refresh"
///
/// [[steps]]
/// action = "drag_stop"
/// left = 0
/// top = 0
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub tiler: TilerConfig,
    pub viewport: Size,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Refresh,
    /// Move the frame without releasing it.
    Drag { left: f64, top: f64 },
    /// Move the frame and release it.
    DragStop { left: f64, top: f64 },
    Resize { width: f64, height: f64 },
    Jump { x: i64, y: i64 },
    Reload,
    /// Wait for every outstanding deferred fetch and show the results.
    Deliver,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Refresh => "refresh",
            Step::Drag { .. } => "drag",
            Step::DragStop { .. } => "drag_stop",
            Step::Resize { .. } => "resize",
            Step::Jump { .. } => "jump",
            Step::Reload => "reload",
            Step::Deliver => "deliver",
        }
    }
}

impl Script {
    pub fn from_toml_str(source: &str) -> Result<Self, ReplayError> {
        let script: Script = toml::from_str(source)?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let source = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
