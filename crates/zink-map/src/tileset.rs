//! Tileset definitions.
//!
//! A tileset definition is a JSON array of
//! `{ "rect": [x, y, w, h], "collision": "collide" | "none" }` entries. Entry
//! `N` describes tile id `N`: `rect` is the source rectangle in the tileset
//! image and `collision` says whether actors collide with the tile. Id `0` is
//! the empty tile and never collides, whatever its entry says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::{TileId, EMPTY_TILE};
use crate::{Rect, TileCoord};

/// Collision kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collision {
    /// Walkable
    #[default]
    None,
    /// Solid
    Collide,
}

/// One tile definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    /// Source rect in the tileset image: `[x, y, width, height]`
    pub rect: [f32; 4],
    /// Collision kind
    pub collision: Collision,
}

impl TileDef {
    /// Source rect as a [`Rect`].
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        let [x, y, w, h] = self.rect;
        Rect::new(x, y, w, h)
    }
}

/// An indexed set of tile definitions, optionally backed by a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tileset {
    tiles: Vec<TileDef>,
    path: Option<PathBuf>,
}

impl Tileset {
    /// Create an in-memory tileset.
    #[must_use]
    pub fn new(tiles: Vec<TileDef>) -> Self {
        Self { tiles, path: None }
    }

    /// Parse a tileset definition.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidAsset`] if any entry lacks `rect` or
    /// `collision` or has an unknown collision kind.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tiles = serde_json::from_str(json).map_err(MapError::from_asset_json)?;
        Ok(Self::new(tiles))
    }

    /// Load a tileset definition file. The tileset remembers the path so
    /// edits can be written back with [`Tileset::save`].
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] if the file cannot be read, otherwise see
    /// [`Tileset::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut tileset = Self::from_json_str(&fs::read_to_string(path)?)?;
        tileset.path = Some(path.to_path_buf());
        tracing::debug!(
            "Loaded {} tile definitions from {}",
            tileset.len(),
            path.display()
        );
        Ok(tileset)
    }

    /// Build a definition from cells of a `tile_size` atlas grid.
    ///
    /// Entries keep the order of `cells`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_cells(
        tile_size: u32,
        cells: impl IntoIterator<Item = (TileCoord, Collision)>,
    ) -> Self {
        let size = tile_size as f32;
        Self::new(
            cells
                .into_iter()
                .map(|(cell, collision)| TileDef {
                    rect: [cell.x as f32 * size, cell.y as f32 * size, size, size],
                    collision,
                })
                .collect(),
        )
    }

    /// Atlas cell size, inferred from the first entry's width.
    #[must_use]
    pub fn tile_size(&self) -> Option<f32> {
        self.tiles.first().map(|t| t.rect[2]).filter(|&w| w > 0.0)
    }

    /// Atlas cell of every entry, assuming a uniform [`Tileset::tile_size`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cells(&self) -> Vec<(TileCoord, Collision)> {
        let Some(size) = self.tile_size() else {
            return Vec::new();
        };
        self.tiles
            .iter()
            .map(|t| {
                let cell = TileCoord::new(
                    (t.rect[0] / size).floor() as i32,
                    (t.rect[1] / size).floor() as i32,
                );
                (cell, t.collision)
            })
            .collect()
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of definitions (including the empty tile's entry).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check whether there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All definitions, indexed by tile id.
    #[must_use]
    pub fn tiles(&self) -> &[TileDef] {
        &self.tiles
    }

    /// Definition of a tile id.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        usize::try_from(id).ok().and_then(|i| self.tiles.get(i))
    }

    /// Check whether actors collide with tile `id`.
    ///
    /// The empty tile and ids without a definition never collide.
    #[must_use]
    pub fn collides(&self, id: TileId) -> bool {
        id != EMPTY_TILE && self.get(id).is_some_and(|t| t.collision == Collision::Collide)
    }

    /// Change a tile's collision kind and write the tileset back to its file.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownTile`] for an id without a definition, or
    /// an I/O error from saving.
    pub fn set_collision(&mut self, id: TileId, collision: Collision) -> Result<()> {
        let tile = usize::try_from(id)
            .ok()
            .and_then(|i| self.tiles.get_mut(i))
            .ok_or(MapError::UnknownTile(id))?;
        tile.collision = collision;
        self.save()
    }

    /// Render the definition as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.tiles)?)
    }

    /// Write the definition to `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or encoding error.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        tracing::info!("Saved tileset to {}", path.display());
        Ok(())
    }

    /// Write the definition back to the file it was loaded from.
    ///
    /// In-memory tilesets have nowhere to go; saving them does nothing.
    ///
    /// # Errors
    ///
    /// Returns an I/O or encoding error.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }
}
