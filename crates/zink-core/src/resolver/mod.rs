//! Actor/map collision resolution.
//!
//! The resolver pushes an actor's box out of static obstacle boxes after the
//! host has integrated movement for the tick. It runs a fixed number of
//! correction passes; each pass picks the obstacle with the largest overlap
//! and moves the actor out of it along the axis of least penetration.
//!
//! # Invariants
//!
//! - Only the actor's position changes; its size is fixed
//! - Exactly one axis is corrected per pass
//! - Obstacle selection is deterministic: the largest absolute overlap area
//!   wins, ties go to the obstacle that comes first in the input
//! - World edges are not clamped; callers that want walls at the edge pass
//!   them in as obstacles
//!
//! # Available Helpers
//!
//! - [`CollisionResolver`]: configurable resolver, 3 passes by default
//! - [`resolve_map_collision`]: one-shot resolve with the default resolver
//! - [`query::CollisionMap`]: per-tile collision flags with the grid probe
//! - [`separation::separate_bodies`]: mutual push-apart of dynamic bodies

pub mod query;
pub mod separation;

pub use query::{obstacles_near, CollisionMap};
pub use separation::separate_bodies;

use glam::Vec2;
use zink_map::Rect;

/// Correction passes per resolve.
///
/// One pass can push the actor into an obstacle it was not overlapping
/// before (an inside corner of two tiles); three passes settle every tile
/// arrangement the games use (single tile, L-corner, one-tile corridor).
pub const DEFAULT_ITERATIONS: usize = 3;

/// Overlap of `obstacle` and `actor`, signed by push-out direction.
///
/// The magnitude is the ordinary overlap. The width is negative when the
/// actor's left edge lies left of the obstacle's (the actor exits toward
/// −x), positive otherwise; the height likewise on the y axis. Disjoint
/// boxes give a zero rect.
#[must_use]
pub fn signed_intersection(obstacle: &Rect, actor: &Rect) -> Rect {
    let mut overlap = obstacle.intersection(actor);
    if actor.x < obstacle.x {
        overlap.width = -overlap.width;
    }
    if actor.y < obstacle.y {
        overlap.height = -overlap.height;
    }
    overlap
}

/// One correction applied during a resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Index of the selected obstacle in the input slice
    pub obstacle: usize,
    /// Offset applied to the actor (non-zero on exactly one axis)
    pub offset: Vec2,
}

/// Outcome of [`CollisionResolver::resolve_detailed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Final actor position
    pub position: Vec2,
    /// Corrections in the order they were applied
    pub corrections: Vec<Correction>,
}

/// Pushes actor boxes out of static obstacles.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use zink_core::resolver::CollisionResolver;
/// use zink_core::zink_map::Rect;
///
/// let wall = Rect::new(16.0, 0.0, 16.0, 16.0);
/// let actor = Rect::new(10.0, 0.0, 16.0, 16.0);
///
/// let resolver = CollisionResolver::new();
/// assert_eq!(resolver.resolve(&[wall], actor), Some(Vec2::new(0.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResolver {
    iterations: usize,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    /// Creates a resolver with [`DEFAULT_ITERATIONS`] passes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Creates a resolver with a custom number of passes.
    #[must_use]
    pub fn with_iterations(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Number of correction passes.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Corrected position for `actor`, or `None` if it does not move.
    ///
    /// Returns `None` for an empty obstacle list and whenever the corrections
    /// cancel out to the original position.
    #[must_use]
    pub fn resolve(&self, obstacles: &[Rect], actor: Rect) -> Option<Vec2> {
        let resolution = self.resolve_detailed(obstacles, actor);
        (resolution.position != actor.position()).then_some(resolution.position)
    }

    /// Resolve and report every correction applied.
    #[must_use]
    pub fn resolve_detailed(&self, obstacles: &[Rect], actor: Rect) -> Resolution {
        let mut current = actor;
        let mut corrections = Vec::new();

        if !obstacles.is_empty() {
            for _ in 0..self.iterations {
                // Nothing overlaps: later passes would see the same state.
                let Some((obstacle, overlap)) = deepest_overlap(obstacles, &current) else {
                    break;
                };
                let offset = if overlap.width.abs() < overlap.height.abs() {
                    Vec2::new(overlap.width, 0.0)
                } else {
                    Vec2::new(0.0, overlap.height)
                };
                current = current.with_position(current.position() + offset);
                corrections.push(Correction { obstacle, offset });
            }
        }

        Resolution {
            position: current.position(),
            corrections,
        }
    }
}

/// Obstacle with the largest absolute overlap area; first one wins ties.
fn deepest_overlap(obstacles: &[Rect], actor: &Rect) -> Option<(usize, Rect)> {
    let mut best = None;
    let mut best_area = 0.0;
    for (i, obstacle) in obstacles.iter().enumerate() {
        let overlap = signed_intersection(obstacle, actor);
        let area = overlap.area().abs();
        if area > best_area {
            best_area = area;
            best = Some((i, overlap));
        }
    }
    best
}

/// Resolve with the default three-pass resolver.
#[must_use]
pub fn resolve_map_collision(obstacles: &[Rect], actor: Rect) -> Option<Vec2> {
    CollisionResolver::new().resolve(obstacles, actor)
}
