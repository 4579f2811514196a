//! # Zink Core
//!
//! Game and editor logic for Legend of Zink, built on the `zink_map` data
//! model.
//!
//! - **Resolver**: pushes actors out of solid map tiles, and bodies out of
//!   each other
//! - **History**: snapshot-hash undo/redo with hash-gated saving and autosave
//! - **Editor**: an editing session tying the map, history and tileset to the
//!   current edit mode
//! - **Transition**: fade-out/load/fade-in scene change
//! - **Timing**: cooldown timers and damped springs
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use zink_core::resolver::CollisionMap;
//! use zink_core::zink_map::{Grid, Tileset, TileDef, Collision};
//!
//! let layer = Grid::from_rows(&[vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
//! let tileset = Tileset::new(vec![
//!     TileDef { rect: [0.0, 0.0, 16.0, 16.0], collision: Collision::None },
//!     TileDef { rect: [16.0, 0.0, 16.0, 16.0], collision: Collision::Collide },
//! ]);
//!
//! let collision = CollisionMap::from_layer(&layer, &tileset);
//! let mut pos = Vec2::new(0.5, 1.0);
//! assert!(collision.handle_collisions(&mut pos));
//! assert_eq!(pos, Vec2::new(0.0, 1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the data model for callers that only depend on this crate
pub use zink_map;

pub mod config;
pub mod editor;
pub mod history;
pub mod resolver;
pub mod timing;
pub mod transition;

#[cfg(test)]
mod tests;

pub use config::EditorConfig;
pub use editor::{EditMode, EditorSession};
pub use history::{EditHistory, HistoryStep};
pub use resolver::{resolve_map_collision, CollisionMap, CollisionResolver};
pub use timing::{CooldownTimer, Spring};
pub use transition::{SceneTransition, TransitionSignal, TransitionState};
