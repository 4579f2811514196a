//! Flood fill over a single grid.

use crate::grid::{Grid, TileId};
use crate::TileCoord;

/// 4-neighbourhood: up, right, down, left.
const NEIGHBOURS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Repaint the 4-connected region of `start` with `new_tile`.
///
/// The region is every cell reachable from `start` through edge-adjacent
/// cells holding the same id `start` held before the fill. Uses an explicit
/// work-list, so region size is bounded by memory rather than stack depth.
///
/// Returns the number of cells repainted. Filling with the id the start cell
/// already has, or starting outside the grid, changes nothing.
///
/// # Example
///
/// ```
/// use zink_map::{flood_fill, Grid, TileCoord};
///
/// let mut grid = Grid::from_rows(&[vec![0, 0, 1], vec![1, 0, 1]]).unwrap();
/// assert_eq!(flood_fill(&mut grid, TileCoord::new(0, 0), 7), 3);
/// assert_eq!(grid.cropped(3, 2), vec![vec![7, 7, 1], vec![1, 7, 1]]);
/// ```
pub fn flood_fill(grid: &mut Grid, start: TileCoord, new_tile: TileId) -> usize {
    let Some(old_tile) = grid.get_at(start) else {
        return 0;
    };
    if old_tile == new_tile {
        return 0;
    }

    // Cells are painted when queued so each one enters the work-list once.
    grid.set_at(start, new_tile);
    let mut painted = 1;
    let mut work = vec![start];

    while let Some(cell) = work.pop() {
        for (dx, dy) in NEIGHBOURS {
            let next = cell.offset(dx, dy);
            if grid.get_at(next) == Some(old_tile) {
                grid.set_at(next, new_tile);
                painted += 1;
                work.push(next);
            }
        }
    }

    painted
}
