//! Whole-match persistence.
//!
//! Snapshots are bincode; `to_json` exists for debugging and fixtures.
//! Activation handlers are not stored and reload as the standard set.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::SnapshotError;

use super::GameState;

impl GameState {
    /// Write the full state, RNG streams and history included.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        log::debug!("saved snapshot to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let game: GameState = bincode::deserialize_from(reader)?;
        log::debug!(
            "loaded snapshot from {} (round {}, {} actions)",
            path.as_ref().display(),
            game.round,
            game.history.len()
        );
        Ok(game)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
