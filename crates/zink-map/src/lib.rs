//! # Zink Map
//!
//! Tile map data model for Legend of Zink and its level editor.
//!
//! A map is a stack of rectangular tile layers plus the things placed on top
//! of them: enemy spawns, the player spawn and trigger tags. This crate owns
//! the storage, the editing primitives and the snapshot format that maps are
//! persisted and hashed in.
//!
//! - **Grid**: bounds-checked tile storage, padded to a fixed extent
//! - **Map**: layers + placements, serialized cropped to its logical size
//! - **Snapshot**: the JSON wire format (`layers`, `enemy_pos`, `spawn`,
//!   `trigger_tags`)
//! - **Tileset**: tile definitions with their atlas rect and collision kind
//!
//! ## Quick Start
//!
//! ```
//! use zink_map::{Map, TileCoord};
//!
//! let mut map = Map::new(2, 40);
//! map.resize(3, 3);
//! map.paint(0, TileCoord::new(1, 1), 4).unwrap();
//!
//! let snapshot = map.serialize();
//! assert_eq!(snapshot.layers[0][1], vec![0, 4, 0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod fill;
pub mod grid;
pub mod hash;
pub mod map;
pub mod snapshot;
pub mod tileset;

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use error::{MapError, Result};
pub use fill::flood_fill;
pub use grid::{Grid, TileId, EMPTY_TILE};
pub use hash::{content_hash, hash_snapshot};
pub use map::{Enemy, Map};
pub use snapshot::MapSnapshot;
pub use tileset::{Collision, TileDef, Tileset};

/// Size of one tile in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Default storage extent (tiles per side) of an editable map.
pub const DEFAULT_MAX_TILES: usize = 40;

/// Axis-aligned bounding box in world units.
///
/// `(x, y)` is the top-left corner; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rect from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// The same rect moved so its top-left corner is at `position`.
    #[must_use]
    pub fn with_position(self, position: Vec2) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Signed area (`width * height`).
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check whether two rects overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap rectangle of two rects, or a zero rect when they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::default();
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect {
            x,
            y,
            width: self.right().min(other.right()) - x,
            height: self.bottom().min(other.bottom()) - y,
        }
    }
}

/// World-space box of the tile whose top-left corner sits at tile-space `pos`.
///
/// `pos` may be fractional: actors are tile-sized and live in tile space.
#[must_use]
pub fn tile_rect(pos: Vec2) -> Rect {
    Rect::new(pos.x * TILE_SIZE, pos.y * TILE_SIZE, TILE_SIZE, TILE_SIZE)
}

/// Integer tile coordinate.
///
/// Ordered by `x`, then `y`, which keeps trigger tag iteration deterministic.
/// Formats as `"x y"`, the key form used by the snapshot format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileCoord {
    /// Create a tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a tile-space position (floor rounding).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn floor(pos: Vec2) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// The coordinate shifted by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Tile-space position of this tile's top-left corner.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// World-space box of this tile.
    #[must_use]
    pub fn rect(self) -> Rect {
        tile_rect(self.as_vec2())
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MapError::InvalidTriggerKey(s.to_string());
        let mut parts = s.split(' ');
        let x = parts.next().ok_or_else(invalid)?;
        let y = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(
            x.parse().map_err(|_| invalid())?,
            y.parse().map_err(|_| invalid())?,
        ))
    }
}
