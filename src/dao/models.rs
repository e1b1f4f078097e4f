use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::state::{PendingScore, ScoreCell, ScoreSheet};

/// Persisted form of the live score sheet.
///
/// Field names match the record layout the browser edition of the tracker
/// wrote to local storage, so an exported data directory stays readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameStateEntity {
    /// Per-player score columns, chronological order.
    pub columns: Vec<Vec<ScoreCell>>,
    /// Pending entry text, one per player (`""`, `"-"`, or an integer).
    pub inputs: Vec<String>,
    /// Player display names.
    pub headers: Vec<String>,
    /// Number of players; redundant with `columns.len()` but part of the
    /// record.
    pub num_columns: usize,
    /// Wild flags for the committed rounds.
    pub wild_rounds: Vec<bool>,
}

/// A finalized, named game as stored in the archive and in the interchange
/// document. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedGameEntity {
    /// User-supplied display name.
    pub name: String,
    /// Save timestamp, RFC 3339 on the wire.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Frozen score columns.
    pub columns: Vec<Vec<ScoreCell>>,
    /// Frozen player names.
    pub headers: Vec<String>,
    /// Frozen wild flags.
    pub wild_rounds: Vec<bool>,
}

impl From<&ScoreSheet> for GameStateEntity {
    fn from(sheet: &ScoreSheet) -> Self {
        Self {
            columns: sheet.columns().to_vec(),
            inputs: sheet.inputs().iter().map(ToString::to_string).collect(),
            headers: sheet.headers().to_vec(),
            num_columns: sheet.player_count(),
            wild_rounds: sheet.wild_rounds().to_vec(),
        }
    }
}

impl GameStateEntity {
    /// Rebuild the runtime sheet, validating shape and entry text.
    ///
    /// Returns `None` for records whose parts are inconsistent or whose
    /// pending entries are not valid score text; such records are treated
    /// as absent.
    pub fn into_sheet(self) -> Option<ScoreSheet> {
        if self.num_columns != self.columns.len() {
            return None;
        }
        let inputs = self
            .inputs
            .iter()
            .map(|raw| PendingScore::parse(raw))
            .collect::<Option<Vec<_>>>()?;
        ScoreSheet::from_parts(self.columns, self.headers, inputs, self.wild_rounds)
    }
}
