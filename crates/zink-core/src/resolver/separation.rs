//! Push-apart of dynamic bodies.
//!
//! Unlike map obstacles, two bodies that overlap both move: each takes half
//! of the overlap along the axis of least penetration. Bodies are then clamped
//! into the arena. Several passes are needed when one push creates another
//! overlap, same as with map collision.

use zink_map::Rect;

/// Separate overlapping bodies and keep them inside `arena`.
///
/// Pairs are visited in index order, so results are deterministic for a
/// given input order. A body larger than the arena ends up aligned to the
/// arena's top-left corner.
pub fn separate_bodies(bodies: &mut [Rect], arena: Rect, iterations: usize) {
    for _ in 0..iterations {
        for j in 1..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                push_apart(a, b);
            }
        }
        for body in bodies.iter_mut() {
            clamp_into(body, &arena);
        }
    }
}

fn push_apart(a: &mut Rect, b: &mut Rect) {
    let overlap = a.intersection(b);
    if overlap.area() <= 0.0 {
        return;
    }
    let (ca, cb) = (a.center(), b.center());
    if overlap.width < overlap.height {
        let half = overlap.width * 0.5;
        let dir = if ca.x < cb.x { -1.0 } else { 1.0 };
        a.x += dir * half;
        b.x -= dir * half;
    } else {
        let half = overlap.height * 0.5;
        let dir = if ca.y < cb.y { -1.0 } else { 1.0 };
        a.y += dir * half;
        b.y -= dir * half;
    }
}

fn clamp_into(body: &mut Rect, arena: &Rect) {
    body.x = body.x.min(arena.right() - body.width).max(arena.x);
    body.y = body.y.min(arena.bottom() - body.height).max(arena.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn test_side_by_side_overlap_splits_evenly() {
        let mut bodies = [
            Rect::new(100.0, 520.0, 30.0, 80.0),
            Rect::new(120.0, 520.0, 30.0, 80.0),
        ];
        separate_bodies(&mut bodies, ARENA, 3);
        assert_eq!(bodies[0].x, 95.0);
        assert_eq!(bodies[1].x, 125.0);
        assert!(!bodies[0].intersects(&bodies[1]));
    }

    #[test]
    fn test_stacked_bodies_separate_vertically() {
        let mut bodies = [
            Rect::new(100.0, 400.0, 30.0, 80.0),
            Rect::new(105.0, 470.0, 30.0, 80.0),
        ];
        separate_bodies(&mut bodies, ARENA, 3);
        assert_eq!(bodies[0].y, 395.0);
        assert_eq!(bodies[1].y, 475.0);
        assert_eq!(bodies[0].x, 100.0);
    }

    #[test]
    fn test_clamped_into_arena() {
        let mut bodies = [Rect::new(-20.0, 590.0, 30.0, 80.0)];
        separate_bodies(&mut bodies, ARENA, 1);
        assert_eq!(bodies[0].position(), glam::Vec2::new(0.0, 520.0));
    }

    #[test]
    fn test_wall_blocks_push() {
        // The left body is pinned against the arena edge, so only the right
        // body's half of each push sticks and the overlap halves per pass.
        let mut bodies = [
            Rect::new(0.0, 520.0, 30.0, 80.0),
            Rect::new(20.0, 520.0, 30.0, 80.0),
        ];
        separate_bodies(&mut bodies, ARENA, 3);
        assert_eq!(bodies[0].x, 0.0);
        assert_eq!(bodies[1].x, 28.75);
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let original = [Rect::new(-5.0, 0.0, 30.0, 80.0), Rect::new(0.0, 0.0, 30.0, 80.0)];
        let mut bodies = original;
        separate_bodies(&mut bodies, ARENA, 0);
        assert_eq!(bodies, original);
    }
}
