//! Obstacle queries against a tile grid.
//!
//! Actors are one tile in size and positioned in tile space, so an actor can
//! only ever touch the tile under its floor-rounded position and that tile's
//! right, lower, and lower-right neighbours. Only those four cells are
//! probed.

use glam::Vec2;
use zink_map::{tile_rect, Grid, Rect, TileCoord, TileId, Tileset};

use super::CollisionResolver;

/// Probe offsets: the actor's tile, right, down, down-right.
const PROBES: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

fn probe(pos: Vec2, mut is_solid: impl FnMut(TileCoord) -> bool) -> Vec<Rect> {
    let base = TileCoord::floor(pos);
    PROBES
        .iter()
        .map(|&(dx, dy)| base.offset(dx, dy))
        .filter(|&cell| is_solid(cell))
        .map(TileCoord::rect)
        .collect()
}

/// Boxes of the solid tiles an actor at tile-space `pos` may overlap.
///
/// Cells outside the grid are never solid. Boxes come back in probe order.
pub fn obstacles_near(grid: &Grid, pos: Vec2, collides: impl Fn(TileId) -> bool) -> Vec<Rect> {
    probe(pos, |cell| grid.get_at(cell).is_some_and(|id| collides(id)))
}

/// Per-cell collision flags for one map layer.
///
/// Built once per scene from the collision layer and the tileset, then
/// queried by every moving actor each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMap {
    width: usize,
    height: usize,
    solid: Vec<bool>,
    resolver: CollisionResolver,
}

impl CollisionMap {
    /// Flags from a layer and a tile predicate.
    pub fn from_fn(layer: &Grid, collides: impl Fn(TileId) -> bool) -> Self {
        Self {
            width: layer.width(),
            height: layer.height(),
            solid: layer.cells().map(|(_, id)| collides(id)).collect(),
            resolver: CollisionResolver::new(),
        }
    }

    /// Flags from a layer and the tileset's collision kinds.
    #[must_use]
    pub fn from_layer(layer: &Grid, tileset: &Tileset) -> Self {
        Self::from_fn(layer, |id| tileset.collides(id))
    }

    /// Use a specific resolver for [`CollisionMap::handle_collisions`].
    #[must_use]
    pub fn with_resolver(mut self, resolver: CollisionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Check whether a cell is solid. Cells outside the map are not.
    #[must_use]
    pub fn is_solid(&self, cell: TileCoord) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) else {
            return false;
        };
        x < self.width && y < self.height && self.solid[y * self.width + x]
    }

    /// Boxes of the solid tiles an actor at tile-space `pos` may overlap.
    #[must_use]
    pub fn obstacles_near(&self, pos: Vec2) -> Vec<Rect> {
        probe(pos, |cell| self.is_solid(cell))
    }

    /// Push a tile-space actor position out of solid tiles.
    ///
    /// Returns `true` if the position was corrected.
    pub fn handle_collisions(&self, pos: &mut Vec2) -> bool {
        let obstacles = self.obstacles_near(*pos);
        match self.resolver.resolve(&obstacles, tile_rect(*pos)) {
            Some(corrected) => {
                *pos = corrected / zink_map::TILE_SIZE;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zink_map::{Collision, TILE_SIZE};

    /// 3x3 grid with a single solid tile in the middle.
    fn centre_block() -> Grid {
        Grid::from_rows(&[vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap()
    }

    fn tileset() -> Tileset {
        Tileset::from_cells(
            16,
            [
                (TileCoord::new(0, 0), Collision::None),
                (TileCoord::new(1, 0), Collision::Collide),
            ],
        )
    }

    #[test]
    fn test_probe_covers_four_cells() {
        let grid = Grid::from_rows(&[vec![1, 1], vec![1, 1]]).unwrap();
        let obstacles = obstacles_near(&grid, Vec2::new(0.5, 0.5), |id| id == 1);
        assert_eq!(
            obstacles,
            vec![
                tile_rect(Vec2::new(0.0, 0.0)),
                tile_rect(Vec2::new(1.0, 0.0)),
                tile_rect(Vec2::new(0.0, 1.0)),
                tile_rect(Vec2::new(1.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_probe_uses_floor_and_skips_out_of_bounds() {
        let grid = Grid::from_rows(&[vec![1, 1], vec![1, 1]]).unwrap();
        // floor(-0.5) = -1: only (0, 0) of the probed cells is in bounds.
        let obstacles = obstacles_near(&grid, Vec2::new(-0.5, -0.5), |id| id == 1);
        assert_eq!(obstacles, vec![tile_rect(Vec2::ZERO)]);
    }

    #[test]
    fn test_far_away_position_finds_nothing() {
        let grid = Grid::new(4, 4);
        assert!(obstacles_near(&grid, Vec2::new(3.0e9, 0.0), |_| true).is_empty());
        assert!(obstacles_near(&grid, Vec2::new(-3.0e9, 3.0e9), |_| true).is_empty());

        let map = CollisionMap::from_layer(&centre_block(), &tileset());
        let mut pos = Vec2::new(3.0e9, -3.0e9);
        assert!(!map.handle_collisions(&mut pos));
        assert_eq!(pos, Vec2::new(3.0e9, -3.0e9));
    }

    #[test]
    fn test_collision_map_matches_tileset() {
        let map = CollisionMap::from_layer(&centre_block(), &tileset());
        assert!(map.is_solid(TileCoord::new(1, 1)));
        assert!(!map.is_solid(TileCoord::new(0, 1)));
        assert!(!map.is_solid(TileCoord::new(-1, 1)));
        assert!(!map.is_solid(TileCoord::new(3, 1)));
    }

    #[test]
    fn test_collision_map_probe_matches_grid_probe() {
        let grid = centre_block();
        let map = CollisionMap::from_layer(&grid, &tileset());
        for pos in [Vec2::new(0.5, 1.0), Vec2::new(1.2, 0.3), Vec2::new(2.0, 2.0)] {
            assert_eq!(
                map.obstacles_near(pos),
                obstacles_near(&grid, pos, |id| id == 1)
            );
        }
    }

    #[test]
    fn test_half_tile_overlap_pushes_left() {
        let map = CollisionMap::from_layer(&centre_block(), &tileset());
        let mut pos = Vec2::new(0.5, 1.0);
        assert!(map.handle_collisions(&mut pos));
        assert_eq!(pos, Vec2::new(0.0, 1.0));
        // Right edge now sits on the solid tile's left edge.
        assert_eq!(pos.x * TILE_SIZE + TILE_SIZE, TILE_SIZE);
    }

    #[test]
    fn test_resolver_without_passes_leaves_overlap() {
        let resolver = CollisionResolver::with_iterations(0);
        assert_eq!(resolver.iterations(), 0);
        let map = CollisionMap::from_layer(&centre_block(), &tileset()).with_resolver(resolver);
        let mut pos = Vec2::new(0.5, 1.0);
        assert!(!map.handle_collisions(&mut pos));
        assert_eq!(pos, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_clear_position_untouched() {
        let map = CollisionMap::from_layer(&centre_block(), &tileset());
        let mut pos = Vec2::new(0.0, 0.0);
        assert!(!map.handle_collisions(&mut pos));
        assert_eq!(pos, Vec2::ZERO);
    }
}
