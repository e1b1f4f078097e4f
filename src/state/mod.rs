//! Runtime model of the live game: the score sheet and its editing mode.

pub mod editing;
pub mod sheet;

pub use self::editing::{EditLocked, EditMode};
pub use self::sheet::{PendingScore, ScoreBand, ScoreCell, ScoreSheet, SheetError, column_total};
