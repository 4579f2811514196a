//! Map snapshot: the persisted and hashed form of a map.
//!
//! ```json
//! {
//!   "layers": [[[0, 1], [1, 0]]],
//!   "enemy_pos": [[3.0, 4.0]],
//!   "spawn": [1.0, 1.0],
//!   "trigger_tags": {"2 5": "cave"}
//! }
//! ```
//!
//! Snapshots are plain data with a deterministic encoding: trigger tags are
//! kept in a sorted map, so encoding an unchanged map always yields the same
//! bytes and therefore the same content hash.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::TileId;

/// Structural snapshot of a map, cropped to its logical size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// One `rows x columns` array of tile ids per layer
    pub layers: Vec<Vec<Vec<TileId>>>,
    /// Enemy spawn positions in tile space
    #[serde(default)]
    pub enemy_pos: Vec<[f32; 2]>,
    /// Player spawn in tile space
    pub spawn: [f32; 2],
    /// Trigger tags keyed by `"x y"`
    #[serde(default)]
    pub trigger_tags: BTreeMap<String, String>,
}

impl MapSnapshot {
    /// Compact byte encoding used for history entries and hashing.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] if encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode bytes produced by [`MapSnapshot::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidAsset`] for data that does not match the
    /// snapshot schema and [`MapError::Json`] for malformed JSON.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(MapError::from_asset_json)
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// See [`MapSnapshot::decode`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MapError::from_asset_json)
    }

    /// Render the snapshot as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] if the file cannot be read, otherwise see
    /// [`MapSnapshot::decode`].
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let snapshot = Self::decode(&bytes)?;
        tracing::debug!("Loaded map snapshot from {}", path.display());
        Ok(snapshot)
    }

    /// Write the snapshot to a JSON file.
    ///
    /// The data goes to a sibling temp file first and is renamed over `path`,
    /// so an interrupted write never leaves a truncated map behind.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] or [`MapError::Json`] on failure.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        fs::write(&temp_path, self.encode()?)?;
        fs::rename(&temp_path, path)?;

        tracing::debug!("Wrote map snapshot to {}", path.display());
        Ok(())
    }

    /// Logical `(width, height)` of the snapshot, taken from its first layer.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        self.layers.first().map_or((0, 0), |layer| {
            (layer.first().map_or(0, Vec::len), layer.len())
        })
    }
}
