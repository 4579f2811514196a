//! Snapshot-based undo/redo for the map editor.
//!
//! After every editor tick the map is serialized, encoded, and hashed. A hash
//! that differs from the last known one pushes a new entry onto a bounded
//! history. Stepping through the history writes the entry back into the map
//! and adopts its hash, so the following tick sees no change.
//!
//! Editing after stepping back does not discard the states that were undone.
//! The abandoned traversal is squashed onto the end of the history in reverse
//! order before the new edit, so repeated undo from the new edit walks back
//! through everything that was ever on screen.
//!
//! ```text
//! S0 A B C            edits; cursor on C
//! S0 A B C            undo twice; cursor on A, map shows A
//! S0 A B C B A D      edit D
//! ```
//!
//! Undo from `D` now shows `A B C B A S0`.

mod autosave;

pub use autosave::{autosave_path, Autosave};

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use zink_map::{content_hash, Map, MapSnapshot, Result};

use crate::config::DEFAULT_HISTORY_CAPACITY;

/// Direction of a history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    /// Step back (-1)
    Undo,
    /// Step forward (+1)
    Redo,
}

impl HistoryStep {
    /// Cursor delta of the step.
    #[must_use]
    pub fn delta(self) -> isize {
        match self {
            Self::Undo => -1,
            Self::Redo => 1,
        }
    }
}

/// Bounded undo history of encoded map snapshots.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<Vec<u8>>,
    capacity: usize,
    /// Negative index from the end: -1 is the newest entry.
    undo_pos: isize,
    level_hash: Option<u64>,
    /// Hash last written to each save target.
    saved_hashes: BTreeMap<PathBuf, u64>,
    current: Option<MapSnapshot>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl EditHistory {
    /// Create an empty history keeping at most `capacity` entries (at least
    /// one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            undo_pos: -1,
            level_hash: None,
            saved_hashes: BTreeMap::new(),
            current: None,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position, counted from the newest entry (`-1`).
    #[must_use]
    pub fn cursor(&self) -> isize {
        self.undo_pos
    }

    /// Hash of the state the map is known to be in.
    #[must_use]
    pub fn level_hash(&self) -> Option<u64> {
        self.level_hash
    }

    /// Check whether the known state differs from the one last written to
    /// `path`.
    #[must_use]
    pub fn is_dirty(&self, path: &Path) -> bool {
        self.saved_hashes.get(path).copied() != self.level_hash
    }

    /// Most recent snapshot seen by [`EditHistory::update`] or restored by
    /// [`EditHistory::step_history`].
    #[must_use]
    pub fn current(&self) -> Option<&MapSnapshot> {
        self.current.as_ref()
    }

    /// Record the map's state. Returns `true` if a new entry was pushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded.
    pub fn update(&mut self, map: &Map) -> Result<bool> {
        let snapshot = map.serialize();
        let bytes = snapshot.encode()?;
        let hash = content_hash(&bytes);
        self.current = Some(snapshot);

        if self.level_hash == Some(hash) {
            return Ok(false);
        }

        if self.undo_pos != -1 {
            self.squash();
        }
        self.push(bytes);
        self.undo_pos = -1;
        self.level_hash = Some(hash);
        tracing::debug!("History entry pushed ({} of {})", self.len(), self.capacity);
        Ok(true)
    }

    /// Append the undone entries, cursor inclusive and newest exclusive, in
    /// reverse order.
    fn squash(&mut self) {
        let start = self.index_of(self.undo_pos);
        let end = self.entries.len().saturating_sub(1);
        let abandoned: Vec<Vec<u8>> = self
            .entries
            .range(start..end)
            .rev()
            .cloned()
            .collect();
        tracing::debug!("Squashing {} undone entries into history", abandoned.len());
        for bytes in abandoned {
            self.push(bytes);
        }
    }

    fn push(&mut self, bytes: Vec<u8>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(bytes);
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn index_of(&self, pos: isize) -> usize {
        (self.entries.len() as isize + pos).max(0) as usize
    }

    /// Move the cursor one step and write that entry into `map`.
    ///
    /// The cursor is clamped to the recorded range, so stepping past either
    /// end re-applies the end entry. Returns the applied snapshot, or `None`
    /// if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be decoded or does not fit the
    /// map. The cursor and the map are left unchanged in that case.
    #[allow(clippy::cast_possible_wrap)]
    pub fn step_history(
        &mut self,
        step: HistoryStep,
        map: &mut Map,
    ) -> Result<Option<MapSnapshot>> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let pos = (self.undo_pos + step.delta()).clamp(-(self.entries.len() as isize), -1);
        let bytes = &self.entries[self.index_of(pos)];
        let hash = content_hash(bytes);
        let snapshot = MapSnapshot::decode(bytes)?;
        map.apply_snapshot(&snapshot)?;

        self.level_hash = Some(hash);
        self.undo_pos = pos;
        self.current = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    /// Write the current snapshot to `path` if it changed since the last
    /// save to that same path. Returns `true` if a file was written.
    ///
    /// Each path is tracked on its own, so an autosave does not mark the map
    /// file itself as saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_current(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !self.is_dirty(path) {
            return Ok(false);
        }
        let (Some(snapshot), Some(hash)) = (&self.current, self.level_hash) else {
            return Ok(false);
        };
        tracing::info!("Saving map to {}", path.display());
        snapshot.write_to(path)?;
        self.saved_hashes.insert(path.to_path_buf(), hash);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zink_map::TileCoord;

    fn paint(map: &mut Map, tile: u32) {
        map.paint(0, TileCoord::new(0, 0), tile).unwrap();
    }

    fn shown(map: &Map) -> u32 {
        map.background().unwrap().get(0, 0).unwrap()
    }

    /// History of S0 (empty) followed by edits painting `tiles` one by one.
    fn recorded(tiles: &[u32]) -> (EditHistory, Map) {
        let mut history = EditHistory::default();
        let mut map = Map::new(1, 4);
        history.update(&map).unwrap();
        for &tile in tiles {
            paint(&mut map, tile);
            assert!(history.update(&map).unwrap());
        }
        (history, map)
    }

    fn undo_trail(history: &mut EditHistory, map: &mut Map, steps: usize) -> Vec<u32> {
        (0..steps)
            .map(|_| {
                history.step_history(HistoryStep::Undo, map).unwrap();
                shown(map)
            })
            .collect()
    }

    mod update_tests {
        use super::*;

        #[test]
        fn unchanged_map_pushes_nothing() {
            let (mut history, map) = recorded(&[1]);
            assert!(!history.update(&map).unwrap());
            assert_eq!(history.len(), 2);
        }

        #[test]
        fn capacity_evicts_oldest() {
            let mut history = EditHistory::new(3);
            let mut map = Map::new(1, 4);
            for tile in 1..=5 {
                paint(&mut map, tile);
                history.update(&map).unwrap();
            }
            assert_eq!(history.len(), 3);
            assert_eq!(undo_trail(&mut history, &mut map, 3), vec![4, 3, 3]);
        }

        #[test]
        fn current_tracks_latest_state() {
            let (history, map) = recorded(&[1, 2]);
            assert_eq!(history.current(), Some(&map.serialize()));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn empty_history_steps_to_nothing() {
            let mut history = EditHistory::default();
            let mut map = Map::new(1, 4);
            assert_eq!(history.step_history(HistoryStep::Undo, &mut map).unwrap(), None);
        }

        #[test]
        fn undo_then_redo() {
            let (mut history, mut map) = recorded(&[1, 2]);
            assert_eq!(undo_trail(&mut history, &mut map, 1), vec![1]);
            history.step_history(HistoryStep::Redo, &mut map).unwrap();
            assert_eq!(shown(&map), 2);
            assert_eq!(history.cursor(), -1);
        }

        #[test]
        fn cursor_is_clamped() {
            let (mut history, mut map) = recorded(&[1]);
            assert_eq!(undo_trail(&mut history, &mut map, 4), vec![0, 0, 0, 0]);
            assert_eq!(history.cursor(), -2);
            for _ in 0..3 {
                history.step_history(HistoryStep::Redo, &mut map).unwrap();
            }
            assert_eq!(history.cursor(), -1);
            assert_eq!(shown(&map), 1);
        }

        #[test]
        fn restored_state_is_not_a_new_edit() {
            let (mut history, mut map) = recorded(&[1, 2]);
            history.step_history(HistoryStep::Undo, &mut map).unwrap();
            assert!(!history.update(&map).unwrap());
            assert_eq!(history.len(), 3);
            assert_eq!(history.cursor(), -2);
        }

        #[test]
        fn undo_restores_logical_size() {
            let mut history = EditHistory::default();
            let mut map = Map::new(1, 8);
            map.resize(4, 4);
            history.update(&map).unwrap();
            map.resize(6, 2);
            history.update(&map).unwrap();

            history.step_history(HistoryStep::Undo, &mut map).unwrap();
            assert_eq!((map.width(), map.height()), (4, 4));
        }
    }

    mod squash_tests {
        use super::*;

        #[test]
        fn edit_after_undo_keeps_abandoned_states() {
            // S0 A B C, undo to A, edit D.
            let (mut history, mut map) = recorded(&[1, 2, 3]);
            assert_eq!(undo_trail(&mut history, &mut map, 2), vec![2, 1]);
            history.update(&map).unwrap();

            paint(&mut map, 4);
            assert!(history.update(&map).unwrap());
            assert_eq!(history.len(), 7);
            assert_eq!(history.cursor(), -1);

            assert_eq!(
                undo_trail(&mut history, &mut map, 6),
                vec![1, 2, 3, 2, 1, 0]
            );
        }

        #[test]
        fn single_undo_then_edit_appends_cursor_state() {
            let (mut history, mut map) = recorded(&[1, 2]);
            undo_trail(&mut history, &mut map, 1);
            paint(&mut map, 7);
            history.update(&map).unwrap();
            // S0 A B A D
            assert_eq!(undo_trail(&mut history, &mut map, 4), vec![1, 2, 1, 0]);
        }

        #[test]
        fn squash_respects_capacity() {
            let mut history = EditHistory::new(4);
            let mut map = Map::new(1, 4);
            for tile in 1..=4 {
                paint(&mut map, tile);
                history.update(&map).unwrap();
            }
            undo_trail(&mut history, &mut map, 3);
            paint(&mut map, 9);
            history.update(&map).unwrap();
            // 1 2 3 4 3 2 1 9, oldest four evicted.
            assert_eq!(history.len(), 4);
            assert_eq!(undo_trail(&mut history, &mut map, 3), vec![1, 2, 3]);
        }
    }

    mod save_tests {
        use super::*;

        #[test]
        fn save_is_hash_gated() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.json");
            let (mut history, _) = recorded(&[1]);

            assert!(history.save_current(&path).unwrap());
            assert!(!history.save_current(&path).unwrap());
            assert!(!history.is_dirty(&path));
        }

        #[test]
        fn saved_file_holds_current_state() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.json");
            let (mut history, mut map) = recorded(&[1, 2]);
            history.save_current(&path).unwrap();

            history.step_history(HistoryStep::Undo, &mut map).unwrap();
            assert!(history.is_dirty(&path));
            assert!(history.save_current(&path).unwrap());
            assert_eq!(MapSnapshot::read_from(&path).unwrap(), map.serialize());
        }

        #[test]
        fn each_target_is_gated_separately() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.json");
            let backup = autosave_path(&path);
            let (mut history, map) = recorded(&[1]);

            assert!(history.save_current(&backup).unwrap());
            assert!(history.is_dirty(&path));
            assert!(history.save_current(&path).unwrap());
            assert!(!history.save_current(&backup).unwrap());
            assert!(!history.save_current(&path).unwrap());
            assert_eq!(MapSnapshot::read_from(&path).unwrap(), map.serialize());
        }

        #[test]
        fn nothing_recorded_saves_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("level.json");
            let mut history = EditHistory::default();
            assert!(!history.save_current(&path).unwrap());
            assert!(!path.exists());
        }
    }
}
