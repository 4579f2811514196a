//! Rectangular tile storage.
//!
//! A grid maps integer `(column, row)` coordinates to tile ids. Every access
//! is bounds-checked: reads outside the grid return `None` and writes outside
//! it are ignored, so callers can probe neighbours near the map edge without
//! special cases.

use crate::error::{MapError, Result};
use crate::TileCoord;

/// Tile identifier. Indexes into the tileset; `0` is the empty tile.
pub type TileId = u32;

/// The empty tile.
pub const EMPTY_TILE: TileId = 0;

/// Row-major rectangular grid of tile ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl Grid {
    /// Create a grid filled with [`EMPTY_TILE`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![EMPTY_TILE; width * height],
        }
    }

    /// Build a grid from rows of tile ids.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RaggedLayer`] if the rows differ in length.
    pub fn from_rows(rows: &[Vec<TileId>]) -> Result<Self> {
        Self::from_layer_rows(0, rows)
    }

    /// Same as [`Grid::from_rows`], reporting `layer` in errors.
    pub(crate) fn from_layer_rows(layer: usize, rows: &[Vec<TileId>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(MapError::RaggedLayer {
                    layer,
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            tiles.extend_from_slice(cells);
        }
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    /// Check whether `(col, row)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some()
    }

    /// Tile at `(col, row)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, col: i32, row: i32) -> Option<TileId> {
        self.index(col, row).map(|i| self.tiles[i])
    }

    /// Tile at a coordinate, or `None` outside the grid.
    #[must_use]
    pub fn get_at(&self, coord: TileCoord) -> Option<TileId> {
        self.get(coord.x, coord.y)
    }

    /// Overwrite the tile at `(col, row)`.
    ///
    /// Returns `true` if the cell changed. Writes outside the grid and writes
    /// of the value already stored are no-ops.
    pub fn set(&mut self, col: i32, row: i32, value: TileId) -> bool {
        match self.index(col, row) {
            Some(i) if self.tiles[i] != value => {
                self.tiles[i] = value;
                true
            }
            _ => false,
        }
    }

    /// Overwrite the tile at a coordinate. See [`Grid::set`].
    pub fn set_at(&mut self, coord: TileCoord, value: TileId) -> bool {
        self.set(coord.x, coord.y, value)
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        (0..self.height).map(move |r| &self.tiles[r * self.width..(r + 1) * self.width])
    }

    /// Iterate over every cell with its coordinate, row by row.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, TileId)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &tile)| (TileCoord::new(x as i32, y as i32), tile))
        })
    }

    /// The top-left `width x height` region as nested rows.
    ///
    /// Dimensions larger than the grid are clamped to it.
    #[must_use]
    pub fn cropped(&self, width: usize, height: usize) -> Vec<Vec<TileId>> {
        let width = width.min(self.width);
        self.rows()
            .take(height)
            .map(|row| row[..width].to_vec())
            .collect()
    }

    /// A `width x height` copy of this grid, extended with empty tiles.
    ///
    /// Cells beyond the new size are dropped.
    #[must_use]
    pub fn padded(&self, width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        let copy_width = width.min(self.width);
        for (r, row) in self.rows().take(height).enumerate() {
            grid.tiles[r * width..r * width + copy_width].copy_from_slice(&row[..copy_width]);
        }
        grid
    }

    /// Check whether every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|&t| t == EMPTY_TILE)
    }
}
