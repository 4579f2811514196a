//! Test fixtures.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use zink_map::{Collision, TileCoord, Tileset};

use crate::config::EditorConfig;
use crate::editor::EditorSession;

/// Install a log subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Config with an 8x8 storage extent.
pub fn small_config() -> EditorConfig {
    EditorConfig {
        max_tiles: 8,
        ..Default::default()
    }
}

/// Three definitions: empty, a wall, and a floor tile.
pub fn sample_tileset() -> Tileset {
    Tileset::from_cells(
        16,
        [
            (TileCoord::new(0, 0), Collision::None),
            (TileCoord::new(1, 0), Collision::Collide),
            (TileCoord::new(2, 0), Collision::None),
        ],
    )
}

/// Paint `count` random tiles through the session, ids in `0..3`, one
/// frame per tile.
pub fn scribble(session: &mut EditorSession, rng: &mut ChaCha8Rng, count: usize) {
    let (width, height) = (session.map().width(), session.map().height());
    for _ in 0..count {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        session.select_tile(rng.gen_range(0..3));
        let coord = TileCoord::new(
            i32::try_from(x).unwrap_or_default(),
            i32::try_from(y).unwrap_or_default(),
        );
        session.primary_action(coord).unwrap();
        session.end_frame(std::time::Instant::now()).unwrap();
    }
}
