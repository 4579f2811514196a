//! Editable tile map.
//!
//! A [`Map`] stores its layers at a fixed storage extent (`extent x extent`
//! tiles) and tracks a separate logical width and height. Editing never
//! reallocates and never has to check against the logical size; the logical
//! size only matters when the map is serialized, where every layer is cropped
//! to it.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;

use crate::error::{MapError, Result};
use crate::fill::flood_fill;
use crate::grid::{Grid, TileId};
use crate::snapshot::MapSnapshot;
use crate::{Rect, TileCoord};

/// Enemy spawn descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Spawn position in tile space
    pub position: Vec2,
    /// Waypoints the enemy patrols between (not persisted)
    pub patrol_path: Vec<TileCoord>,
}

impl Enemy {
    /// Create an enemy with no patrol path.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            patrol_path: Vec::new(),
        }
    }
}

/// Decoded contents of a snapshot, validated against a storage extent.
struct MapParts {
    layers: Vec<Grid>,
    width: usize,
    height: usize,
    enemies: Vec<Enemy>,
    spawn: Vec2,
    trigger_tags: BTreeMap<TileCoord, String>,
}

impl MapParts {
    fn decode(snapshot: &MapSnapshot, extent: usize) -> Result<Self> {
        if snapshot.layers.is_empty() {
            return Err(MapError::NoLayers);
        }

        let (width, height) = snapshot.dimensions();
        if width == 0 || height == 0 {
            return Err(MapError::InvalidAsset(format!(
                "map is {width}x{height} tiles, expected at least 1x1"
            )));
        }
        if width > extent || height > extent {
            return Err(MapError::ExceedsExtent {
                width,
                height,
                extent,
            });
        }

        let mut layers = Vec::with_capacity(snapshot.layers.len());
        for (i, rows) in snapshot.layers.iter().enumerate() {
            let grid = Grid::from_layer_rows(i, rows)?;
            let found = (grid.width(), grid.height());
            if found != (width, height) {
                return Err(MapError::LayerSizeMismatch {
                    layer: i,
                    expected: (width, height),
                    found,
                });
            }
            layers.push(grid.padded(extent, extent));
        }

        let trigger_tags = snapshot
            .trigger_tags
            .iter()
            .map(|(key, tag)| Ok((key.parse::<TileCoord>()?, tag.clone())))
            .collect::<Result<_>>()?;

        Ok(Self {
            layers,
            width,
            height,
            enemies: snapshot
                .enemy_pos
                .iter()
                .map(|&[x, y]| Enemy::new(Vec2::new(x, y)))
                .collect(),
            spawn: Vec2::from_array(snapshot.spawn),
            trigger_tags,
        })
    }
}

/// A multi-layer tile map with placements.
///
/// Layer 0 is the background (the collision layer in game), layer 1 the
/// foreground.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    layers: Vec<Grid>,
    extent: usize,
    width: usize,
    height: usize,
    enemies: Vec<Enemy>,
    spawn: Vec2,
    trigger_tags: BTreeMap<TileCoord, String>,
}

impl Map {
    /// Create an empty map of `layer_count` layers at the given extent.
    ///
    /// The logical size starts at the full extent and the spawn at `(-1, -1)`
    /// (unset). The extent is at least one tile.
    #[must_use]
    pub fn new(layer_count: usize, extent: usize) -> Self {
        let extent = extent.max(1);
        Self {
            layers: (0..layer_count).map(|_| Grid::new(extent, extent)).collect(),
            extent,
            width: extent,
            height: extent,
            enemies: Vec::new(),
            spawn: Vec2::new(-1.0, -1.0),
            trigger_tags: BTreeMap::new(),
        }
    }

    /// Build a map from a snapshot, padding every layer to `extent`.
    ///
    /// The logical size is taken from the snapshot's layers.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot has no layers, ragged or mismatched layers,
    /// layers larger than `extent`, or malformed trigger keys.
    pub fn from_snapshot(snapshot: &MapSnapshot, extent: usize) -> Result<Self> {
        let parts = MapParts::decode(snapshot, extent)?;
        Ok(Self {
            layers: parts.layers,
            extent,
            width: parts.width,
            height: parts.height,
            enemies: parts.enemies,
            spawn: parts.spawn,
            trigger_tags: parts.trigger_tags,
        })
    }

    /// Load a map from a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or an invalid snapshot (see [`Map::from_snapshot`]).
    pub fn load(path: impl AsRef<Path>, extent: usize) -> Result<Self> {
        Self::from_snapshot(&MapSnapshot::read_from(path)?, extent)
    }

    /// Save the map as a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Fails on I/O or encoding errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.serialize().write_to(path)
    }

    /// Replace this map's contents with a snapshot, keeping the extent.
    ///
    /// On error the map is left untouched.
    ///
    /// # Errors
    ///
    /// See [`Map::from_snapshot`].
    pub fn apply_snapshot(&mut self, snapshot: &MapSnapshot) -> Result<()> {
        let parts = MapParts::decode(snapshot, self.extent)?;
        self.layers = parts.layers;
        self.width = parts.width;
        self.height = parts.height;
        self.enemies = parts.enemies;
        self.spawn = parts.spawn;
        self.trigger_tags = parts.trigger_tags;
        Ok(())
    }

    /// Snapshot of the map cropped to its logical size.
    #[must_use]
    pub fn serialize(&self) -> MapSnapshot {
        MapSnapshot {
            layers: self
                .layers
                .iter()
                .map(|layer| layer.cropped(self.width, self.height))
                .collect(),
            enemy_pos: self.enemies.iter().map(|e| e.position.to_array()).collect(),
            spawn: self.spawn.to_array(),
            trigger_tags: self
                .trigger_tags
                .iter()
                .map(|(coord, tag)| (coord.to_string(), tag.clone()))
                .collect(),
        }
    }

    /// Storage extent (tiles per side).
    #[must_use]
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Logical width in tiles.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height in tiles.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Set the logical size, clamped to `1..=extent` on each axis.
    pub fn resize(&mut self, width: usize, height: usize) {
        let max = self.extent.max(1);
        self.width = width.clamp(1, max);
        self.height = height.clamp(1, max);
    }

    /// All layers.
    #[must_use]
    pub fn layers(&self) -> &[Grid] {
        &self.layers
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer by index.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Grid> {
        self.layers.get(index)
    }

    /// Background layer (layer 0).
    #[must_use]
    pub fn background(&self) -> Option<&Grid> {
        self.layer(0)
    }

    /// Foreground layer (layer 1).
    #[must_use]
    pub fn foreground(&self) -> Option<&Grid> {
        self.layer(1)
    }

    fn layer_mut(&mut self, index: usize) -> Result<&mut Grid> {
        self.layers
            .get_mut(index)
            .ok_or(MapError::UnknownLayer(index))
    }

    /// Paint one tile. Returns `true` if the cell changed.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownLayer`] for a bad layer index.
    pub fn paint(&mut self, layer: usize, coord: TileCoord, tile: TileId) -> Result<bool> {
        Ok(self.layer_mut(layer)?.set_at(coord, tile))
    }

    /// Flood fill from `coord`. Returns the number of cells repainted.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownLayer`] for a bad layer index.
    pub fn flood_fill(&mut self, layer: usize, coord: TileCoord, tile: TileId) -> Result<usize> {
        Ok(flood_fill(self.layer_mut(layer)?, coord, tile))
    }

    /// Enemy spawns.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Place an enemy. Returns its index.
    pub fn add_enemy(&mut self, position: Vec2) -> usize {
        self.enemies.push(Enemy::new(position));
        self.enemies.len() - 1
    }

    /// Player spawn in tile space.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Move the player spawn.
    pub fn set_spawn(&mut self, position: Vec2) {
        self.spawn = position;
    }

    /// Trigger tags by tile.
    #[must_use]
    pub fn trigger_tags(&self) -> &BTreeMap<TileCoord, String> {
        &self.trigger_tags
    }

    /// Tag on a tile, if any.
    #[must_use]
    pub fn trigger_tag(&self, coord: TileCoord) -> Option<&str> {
        self.trigger_tags.get(&coord).map(String::as_str)
    }

    /// Tag a tile. An empty tag removes the tile's tag.
    ///
    /// Returns the previous tag.
    pub fn set_trigger_tag(&mut self, coord: TileCoord, tag: impl Into<String>) -> Option<String> {
        let tag = tag.into();
        if tag.is_empty() {
            self.trigger_tags.remove(&coord)
        } else {
            self.trigger_tags.insert(coord, tag)
        }
    }

    /// Trigger tiles whose box overlaps `actor` (world units).
    pub fn triggers_touching(&self, actor: Rect) -> impl Iterator<Item = (TileCoord, &str)> {
        self.trigger_tags
            .iter()
            .filter(move |(coord, _)| coord.rect().intersects(&actor))
            .map(|(&coord, tag)| (coord, tag.as_str()))
    }
}
