//! Editor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zink_map::DEFAULT_MAX_TILES;

/// Number of snapshots the edit history keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Seconds between autosaves.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

/// Map layers: background and foreground.
pub const DEFAULT_LAYER_COUNT: usize = 2;

/// Configuration for an [`EditorSession`](crate::editor::EditorSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Storage extent of every layer, in tiles per side
    pub max_tiles: usize,
    /// Layers of a new map
    pub layer_count: usize,
    /// Snapshots kept by the edit history
    pub history_capacity: usize,
    /// Seconds between autosaves
    pub autosave_interval_secs: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            layer_count: DEFAULT_LAYER_COUNT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
        }
    }
}

impl EditorConfig {
    /// Create a config with a specific storage extent.
    #[must_use]
    pub fn with_max_tiles(max_tiles: usize) -> Self {
        Self {
            max_tiles,
            ..Default::default()
        }
    }

    /// Autosave interval as a [`Duration`]. Negative or non-finite values
    /// count as zero.
    #[must_use]
    pub fn autosave_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.autosave_interval_secs).unwrap_or(Duration::ZERO)
    }
}
