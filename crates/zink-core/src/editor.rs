//! Map editor session.
//!
//! An [`EditorSession`] owns everything the editor works on: the map, its
//! edit history, the tileset, and the current edit mode. The host turns
//! input into calls on the session and calls [`EditorSession::end_frame`]
//! once per frame so edits are recorded and autosaved.

use std::path::{Path, PathBuf};
use std::time::Instant;

use zink_map::{Collision, Map, MapSnapshot, Result, TileCoord, TileId, Tileset};

use crate::config::EditorConfig;
use crate::history::{autosave_path, Autosave, EditHistory, HistoryStep};

/// Where a map that failed to load is saved instead of its own file.
pub const FALLBACK_MAP_FILE: &str = "tmp.json";

/// What a primary click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Paint tiles of one definition
    Tile {
        /// Selected tile id
        tile_def: TileId,
    },
    /// Select tiles to tag
    Trigger {
        /// Tile whose tag is being edited
        selected: TileCoord,
    },
    /// Place enemies
    Enemy {
        /// Most recently placed enemy
        selected_enemy: Option<usize>,
    },
    /// Move the player spawn
    Spawn,
}

impl Default for EditMode {
    fn default() -> Self {
        Self::Tile { tile_def: 1 }
    }
}

/// One editing session on one map file.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    map: Map,
    map_path: PathBuf,
    history: EditHistory,
    autosave: Autosave,
    tileset: Tileset,
    mode: EditMode,
    selected_layer: usize,
}

impl EditorSession {
    /// Start a session on an already loaded map.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial history entry cannot be recorded.
    pub fn new(
        map: Map,
        tileset: Tileset,
        map_path: impl Into<PathBuf>,
        config: EditorConfig,
    ) -> Result<Self> {
        let mut history = EditHistory::new(config.history_capacity);
        history.update(&map)?;
        Ok(Self {
            autosave: Autosave::new(config.autosave_interval()),
            map,
            map_path: map_path.into(),
            history,
            tileset,
            mode: EditMode::default(),
            selected_layer: 0,
            config,
        })
    }

    /// Start a session on a map file.
    ///
    /// A missing file starts an empty map that will be saved there. A file
    /// that fails to load also starts an empty map, but saves go to
    /// [`FALLBACK_MAP_FILE`] next to it so the broken file is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial history entry cannot be recorded.
    pub fn open(
        map_path: impl AsRef<Path>,
        tileset: Tileset,
        config: EditorConfig,
    ) -> Result<Self> {
        let (map, path) = load_or_empty(map_path.as_ref(), &config);
        Self::new(map, tileset, path, config)
    }

    /// Switch to another map file with a fresh history.
    ///
    /// Unsaved changes to the current map are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial history entry cannot be recorded.
    pub fn open_map(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let (map, path) = load_or_empty(path.as_ref(), &self.config);
        self.replace_map(map, path)
    }

    /// Switch to an empty map that will be saved to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial history entry cannot be recorded.
    pub fn new_map(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let map = Map::new(self.config.layer_count, self.config.max_tiles);
        self.replace_map(map, path.into())
    }

    fn replace_map(&mut self, map: Map, path: PathBuf) -> Result<()> {
        let mut history = EditHistory::new(self.config.history_capacity);
        history.update(&map)?;
        self.map = map;
        self.map_path = path;
        self.history = history;
        self.selected_layer = 0;
        if let EditMode::Enemy { selected_enemy } = &mut self.mode {
            *selected_enemy = None;
        }
        Ok(())
    }

    /// The map being edited.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// File the map is saved to on close.
    #[must_use]
    pub fn map_path(&self) -> &Path {
        &self.map_path
    }

    /// Edit history.
    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Tileset in use.
    #[must_use]
    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    /// Current edit mode.
    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Layer that tile edits go to.
    #[must_use]
    pub fn selected_layer(&self) -> usize {
        self.selected_layer
    }

    /// Paint with tile definition `index`. Ignored if the tileset has no
    /// such definition.
    pub fn select_tile(&mut self, index: usize) {
        if index >= self.tileset.len() {
            return;
        }
        if let Ok(tile_def) = TileId::try_from(index) {
            self.mode = EditMode::Tile { tile_def };
        }
    }

    /// Place enemies on click.
    pub fn enter_enemy_mode(&mut self) {
        self.mode = EditMode::Enemy {
            selected_enemy: None,
        };
    }

    /// Move the spawn on click.
    pub fn enter_spawn_mode(&mut self) {
        self.mode = EditMode::Spawn;
    }

    /// Edit the tag of `coord`.
    pub fn enter_trigger_mode(&mut self, coord: TileCoord) {
        self.mode = EditMode::Trigger { selected: coord };
    }

    /// Send tile edits to `layer`. Ignored for a layer the map lacks.
    pub fn select_layer(&mut self, layer: usize) {
        if layer < self.map.layer_count() {
            self.selected_layer = layer;
        }
    }

    /// Apply the current mode at `coord`. Returns `true` if the map changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected layer does not exist.
    pub fn primary_action(&mut self, coord: TileCoord) -> Result<bool> {
        match &mut self.mode {
            EditMode::Tile { tile_def } => self.map.paint(self.selected_layer, coord, *tile_def),
            EditMode::Trigger { selected } => {
                *selected = coord;
                Ok(false)
            }
            EditMode::Enemy { selected_enemy } => {
                *selected_enemy = Some(self.map.add_enemy(coord.as_vec2()));
                Ok(true)
            }
            EditMode::Spawn => {
                self.map.set_spawn(coord.as_vec2());
                Ok(true)
            }
        }
    }

    /// Flood fill from `coord` with the selected tile. Does nothing outside
    /// tile mode. Returns the number of cells repainted.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected layer does not exist.
    pub fn fill(&mut self, coord: TileCoord) -> Result<usize> {
        match self.mode {
            EditMode::Tile { tile_def } => self.map.flood_fill(self.selected_layer, coord, tile_def),
            _ => Ok(0),
        }
    }

    /// Tag of the tile selected in trigger mode.
    #[must_use]
    pub fn selected_trigger_tag(&self) -> Option<&str> {
        match self.mode {
            EditMode::Trigger { selected } => self.map.trigger_tag(selected),
            _ => None,
        }
    }

    /// Set the tag of the tile selected in trigger mode. An empty tag
    /// removes it. Returns the previous tag.
    pub fn commit_trigger_tag(&mut self, tag: impl Into<String>) -> Option<String> {
        match self.mode {
            EditMode::Trigger { selected } => self.map.set_trigger_tag(selected, tag),
            _ => None,
        }
    }

    /// Collision kind of the tile selected in tile mode.
    #[must_use]
    pub fn selected_collision(&self) -> Option<Collision> {
        match self.mode {
            EditMode::Tile { tile_def } => self.tileset.get(tile_def).map(|t| t.collision),
            _ => None,
        }
    }

    /// Change the collision kind of the selected tile definition and save
    /// the tileset. Returns `true` if the kind changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is missing or the tileset cannot
    /// be saved.
    pub fn set_selected_collision(&mut self, collision: Collision) -> Result<bool> {
        let EditMode::Tile { tile_def } = self.mode else {
            return Ok(false);
        };
        if self.selected_collision() == Some(collision) {
            return Ok(false);
        }
        self.tileset.set_collision(tile_def, collision)?;
        Ok(true)
    }

    /// Set the map's logical size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.map.resize(width, height);
    }

    /// Step back in the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be restored.
    pub fn undo(&mut self) -> Result<Option<MapSnapshot>> {
        self.step(HistoryStep::Undo)
    }

    /// Step forward in the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be restored.
    pub fn redo(&mut self) -> Result<Option<MapSnapshot>> {
        self.step(HistoryStep::Redo)
    }

    fn step(&mut self, step: HistoryStep) -> Result<Option<MapSnapshot>> {
        let snapshot = self.history.step_history(step, &mut self.map)?;
        let enemies = self.map.enemies().len();
        if let EditMode::Enemy { selected_enemy } = &mut self.mode {
            *selected_enemy = selected_enemy.filter(|&i| i < enemies);
        }
        Ok(snapshot)
    }

    /// Record this frame's edits and autosave if due. Returns `true` if an
    /// autosave file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if recording or writing the autosave fails.
    pub fn end_frame(&mut self, now: Instant) -> Result<bool> {
        self.history.update(&self.map)?;
        if !self.autosave.due(now) {
            return Ok(false);
        }
        tracing::debug!("Autosave due");
        self.history.save_current(autosave_path(&self.map_path))
    }

    /// End the session, saving the map to its file if it changed since the
    /// last save. Returns `true` if the file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if recording or writing fails.
    pub fn close(mut self) -> Result<bool> {
        self.history.update(&self.map)?;
        self.history.save_current(&self.map_path)
    }
}

fn load_or_empty(path: &Path, config: &EditorConfig) -> (Map, PathBuf) {
    let empty = || Map::new(config.layer_count, config.max_tiles);
    if !path.exists() {
        return (empty(), path.to_path_buf());
    }
    match Map::load(path, config.max_tiles) {
        Ok(map) => (map, path.to_path_buf()),
        Err(err) => {
            let fallback = path.with_file_name(FALLBACK_MAP_FILE);
            tracing::warn!(
                "Failed to load map {}: {err}; editing an empty map saved to {}",
                path.display(),
                fallback.display()
            );
            (empty(), fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{sample_tileset, small_config};
    use glam::Vec2;
    use std::time::Duration;

    fn session() -> EditorSession {
        let config = small_config();
        let map = Map::new(config.layer_count, config.max_tiles);
        EditorSession::new(map, sample_tileset(), "level.json", config).unwrap()
    }

    mod mode_tests {
        use super::*;

        #[test]
        fn starts_painting_tile_one() {
            assert_eq!(session().mode(), EditMode::Tile { tile_def: 1 });
        }

        #[test]
        fn select_tile_checks_tileset() {
            let mut session = session();
            session.select_tile(2);
            assert_eq!(session.mode(), EditMode::Tile { tile_def: 2 });
            session.select_tile(3);
            assert_eq!(session.mode(), EditMode::Tile { tile_def: 2 });
        }

        #[test]
        fn select_layer_checks_map() {
            let mut session = session();
            session.select_layer(1);
            assert_eq!(session.selected_layer(), 1);
            session.select_layer(2);
            assert_eq!(session.selected_layer(), 1);
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn tile_mode_paints_selected_layer() {
            let mut session = session();
            session.select_layer(1);
            assert!(session.primary_action(TileCoord::new(2, 3)).unwrap());
            assert_eq!(session.map().foreground().unwrap().get(2, 3), Some(1));
            assert_eq!(session.map().background().unwrap().get(2, 3), Some(0));
            assert!(!session.primary_action(TileCoord::new(2, 3)).unwrap());
        }

        #[test]
        fn enemy_mode_selects_new_enemy() {
            let mut session = session();
            session.enter_enemy_mode();
            session.primary_action(TileCoord::new(1, 1)).unwrap();
            session.primary_action(TileCoord::new(4, 2)).unwrap();
            assert_eq!(
                session.mode(),
                EditMode::Enemy {
                    selected_enemy: Some(1)
                }
            );
            assert_eq!(session.map().enemies()[1].position, Vec2::new(4.0, 2.0));
        }

        #[test]
        fn spawn_mode_moves_spawn() {
            let mut session = session();
            session.enter_spawn_mode();
            session.primary_action(TileCoord::new(3, 5)).unwrap();
            assert_eq!(session.map().spawn(), Vec2::new(3.0, 5.0));
        }

        #[test]
        fn trigger_tagging() {
            let mut session = session();
            session.enter_trigger_mode(TileCoord::new(0, 0));
            assert!(!session.primary_action(TileCoord::new(5, 6)).unwrap());
            assert_eq!(session.commit_trigger_tag("cave"), None);
            assert_eq!(session.map().trigger_tag(TileCoord::new(5, 6)), Some("cave"));
            assert_eq!(session.selected_trigger_tag(), Some("cave"));

            assert_eq!(session.commit_trigger_tag(""), Some("cave".to_string()));
            assert!(session.map().trigger_tags().is_empty());
        }

        #[test]
        fn fill_only_in_tile_mode() {
            let mut session = session();
            session.resize(4, 4);
            session.enter_spawn_mode();
            assert_eq!(session.fill(TileCoord::new(0, 0)).unwrap(), 0);
            session.select_tile(2);
            // The whole storage extent is one region.
            assert_eq!(session.fill(TileCoord::new(0, 0)).unwrap(), 8 * 8);
        }

        #[test]
        fn collision_toggle_needs_tile_mode() {
            let mut session = session();
            session.enter_spawn_mode();
            assert!(!session.set_selected_collision(Collision::Collide).unwrap());
            session.select_tile(2);
            assert!(session.set_selected_collision(Collision::Collide).unwrap());
            assert!(!session.set_selected_collision(Collision::Collide).unwrap());
            assert!(session.tileset().collides(2));
        }
    }

    mod frame_tests {
        use super::*;

        #[test]
        fn undo_clears_stale_enemy_selection() {
            let mut session = session();
            session.enter_enemy_mode();
            session.primary_action(TileCoord::new(1, 1)).unwrap();
            session.end_frame(Instant::now()).unwrap();

            session.undo().unwrap();
            assert!(session.map().enemies().is_empty());
            assert_eq!(
                session.mode(),
                EditMode::Enemy {
                    selected_enemy: None
                }
            );
        }

        #[test]
        fn autosave_waits_for_interval() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.json");
            let mut session =
                EditorSession::open(&path, sample_tileset(), small_config()).unwrap();
            session.primary_action(TileCoord::new(0, 0)).unwrap();

            let start = Instant::now();
            assert!(!session.end_frame(start).unwrap());
            assert!(session
                .end_frame(start + Duration::from_secs(31))
                .unwrap());

            let saved = MapSnapshot::read_from(autosave_path(&path)).unwrap();
            assert_eq!(saved, session.map().serialize());
            assert!(!path.exists());
        }
    }
}
