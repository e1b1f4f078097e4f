use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    dao::{kv::KeyValueStore, models::GameStateEntity, storage::StorageError},
    state::{EditLocked, EditMode, ScoreSheet, SheetError},
};

/// Storage key of the live game record.
pub const GAME_STATE_KEY: &str = "gameState";

/// Errors surfaced by live-game operations.
#[derive(Debug, Error)]
pub enum GameStateError {
    /// The persistence backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A history-mutating operation was attempted while viewing.
    #[error(transparent)]
    EditLocked(#[from] EditLocked),
    /// An operation addressed a player or round that does not exist.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// The live game: a [`ScoreSheet`] bound to an injected persistence
/// backend.
///
/// The sheet is restored from the backend at construction and the full
/// record is flushed after every mutating operation; rejected input and
/// mode toggles do not touch storage.
pub struct GameStateStore {
    sheet: ScoreSheet,
    mode: EditMode,
    backend: Arc<dyn KeyValueStore>,
}

impl GameStateStore {
    /// Restore the live game from `backend`, falling back to a fresh
    /// one-player sheet when no record exists or the stored record is
    /// malformed.
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Result<Self, GameStateError> {
        let sheet = match backend.read(GAME_STATE_KEY)? {
            Some(document) => restore_sheet(&document),
            None => {
                debug!("no live game record; starting fresh");
                ScoreSheet::default()
            }
        };
        Ok(Self {
            sheet,
            mode: EditMode::default(),
            backend,
        })
    }

    /// Read access to the live sheet.
    pub fn sheet(&self) -> &ScoreSheet {
        &self.sheet
    }

    /// Current editing mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Store pending entry text for a player; invalid text is rejected in
    /// place. Returns whether the text was accepted.
    pub fn record_input(&mut self, player: usize, raw: &str) -> Result<bool, GameStateError> {
        let accepted = self.sheet.record_input(player, raw)?;
        if accepted {
            self.flush()?;
        }
        Ok(accepted)
    }

    /// Commit the pending entries as a new round.
    pub fn commit_round(&mut self) -> Result<(), GameStateError> {
        self.sheet.commit_round();
        self.flush()
    }

    /// Replace a player's display name.
    pub fn set_header(&mut self, player: usize, text: &str) -> Result<(), GameStateError> {
        self.sheet.set_header(player, text)?;
        self.flush()
    }

    /// Flag or unflag the round currently being entered as wild. The flag
    /// is not part of the persisted record.
    pub fn set_wild_round(&mut self, wild: bool) {
        self.sheet.set_wild_round(wild);
    }

    /// Grow or shrink the sheet to `count` players.
    pub fn set_player_count(&mut self, count: usize) -> Result<(), GameStateError> {
        if self.sheet.set_player_count(count) {
            self.flush()?;
        }
        Ok(())
    }

    /// Delete one committed round everywhere. Requires editing mode.
    pub fn remove_round(&mut self, round: usize) -> Result<(), GameStateError> {
        self.mode.ensure_editing("removing a round")?;
        self.sheet.remove_round(round)?;
        self.flush()
    }

    /// Overwrite a committed cell. Requires editing mode; invalid text is
    /// rejected in place. Returns whether the text was accepted.
    pub fn edit_score(
        &mut self,
        player: usize,
        round: usize,
        raw: &str,
    ) -> Result<bool, GameStateError> {
        self.mode.ensure_editing("editing a score")?;
        let accepted = self.sheet.edit_score(player, round, raw)?;
        if accepted {
            self.flush()?;
        }
        Ok(accepted)
    }

    /// Flip between viewing and editing, returning the new mode.
    pub fn toggle_editing(&mut self) -> EditMode {
        self.mode.toggle()
    }

    /// Zero all committed scores (shape preserved), clear pending entries
    /// and wild flags, and drop the persisted record. The next mutation
    /// re-persists the sheet.
    pub fn reset_after_save(&mut self) -> Result<(), GameStateError> {
        self.sheet.reset_scores();
        self.backend.delete(GAME_STATE_KEY)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), GameStateError> {
        let entity = GameStateEntity::from(&self.sheet);
        let document = serde_json::to_string(&entity).map_err(|source| {
            StorageError::unavailable("cannot serialize the live game record".into(), source)
        })?;
        self.backend.write(GAME_STATE_KEY, &document)?;
        Ok(())
    }
}

/// Parse a stored record, treating malformed content as absent.
fn restore_sheet(document: &str) -> ScoreSheet {
    match serde_json::from_str::<GameStateEntity>(document) {
        Ok(entity) => match entity.into_sheet() {
            Some(sheet) => sheet,
            None => {
                warn!("stored game record has an inconsistent shape; starting fresh");
                ScoreSheet::default()
            }
        },
        Err(err) => {
            warn!(error = %err, "stored game record is malformed; starting fresh");
            ScoreSheet::default()
        }
    }
}
