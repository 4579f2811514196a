//! Error types for map, snapshot and tileset handling.

use thiserror::Error;

use crate::grid::TileId;

/// Errors raised while loading, validating or persisting maps and tilesets.
#[derive(Debug, Error)]
pub enum MapError {
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An asset definition does not match its schema.
    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    /// A map has no tile layers.
    #[error("map has no layers")]
    NoLayers,

    /// A layer row differs in length from the first row.
    #[error("layer {layer} row {row} has {found} tiles, expected {expected}")]
    RaggedLayer {
        /// Layer index
        layer: usize,
        /// Row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// Layers of one map have different dimensions.
    #[error("layer {layer} is {found:?}, expected {expected:?}")]
    LayerSizeMismatch {
        /// Layer index
        layer: usize,
        /// (width, height) of layer 0
        expected: (usize, usize),
        /// (width, height) of the offending layer
        found: (usize, usize),
    },

    /// A layer does not fit into the map's storage extent.
    #[error("layer of {width}x{height} tiles exceeds the {extent}x{extent} map extent")]
    ExceedsExtent {
        /// Layer width
        width: usize,
        /// Layer height
        height: usize,
        /// Storage extent
        extent: usize,
    },

    /// A trigger tag key is not of the form `"x y"`.
    #[error("invalid trigger key: {0:?}")]
    InvalidTriggerKey(String),

    /// A layer index outside the map's layers.
    #[error("unknown layer {0}")]
    UnknownLayer(usize),

    /// A tile id with no tileset definition.
    #[error("unknown tile {0}")]
    UnknownTile(TileId),
}

impl MapError {
    /// Classify a JSON error raised while decoding an asset.
    ///
    /// Data that parses but does not match the schema (missing fields, wrong
    /// types, unknown variants) is an invalid asset; everything else stays a
    /// JSON error.
    pub(crate) fn from_asset_json(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => Self::InvalidAsset(err.to_string()),
            _ => Self::Json(err),
        }
    }
}

/// Result alias used throughout the map crates.
pub type Result<T> = std::result::Result<T, MapError>;
