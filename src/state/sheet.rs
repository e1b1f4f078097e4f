use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One committed score of a round.
///
/// Cells are usually whole numbers, but free-form editing and the
/// in-progress minus sign can leave raw text behind, and imported documents
/// may carry either representation. The untagged wire form accepts both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScoreCell {
    /// A committed numeric score.
    Number(i64),
    /// Raw cell text such as `""` or `"-"`.
    Text(String),
}

impl ScoreCell {
    /// Numeric value of the cell, if its content parses as an integer.
    pub fn numeric(&self) -> Option<i64> {
        match self {
            ScoreCell::Number(value) => Some(*value),
            ScoreCell::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Display band for the cell, if its content is numeric.
    pub fn band(&self) -> Option<ScoreBand> {
        self.numeric().map(ScoreBand::for_score)
    }
}

impl std::fmt::Display for ScoreCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreCell::Number(value) => write!(f, "{value}"),
            ScoreCell::Text(text) => f.write_str(text),
        }
    }
}

/// Display classification of a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Zero or below.
    Green,
    /// 1 through 14.
    White,
    /// 15 through 24.
    Yellow,
    /// 25 and above.
    Red,
}

impl ScoreBand {
    /// Classify a numeric score.
    pub fn for_score(score: i64) -> Self {
        if score <= 0 {
            ScoreBand::Green
        } else if score <= 14 {
            ScoreBand::White
        } else if score <= 24 {
            ScoreBand::Yellow
        } else {
            ScoreBand::Red
        }
    }

    /// Lowercase band name used by the display layer.
    pub fn name(self) -> &'static str {
        match self {
            ScoreBand::Green => "green",
            ScoreBand::White => "white",
            ScoreBand::Yellow => "yellow",
            ScoreBand::Red => "red",
        }
    }
}

/// A pending, not-yet-committed score entry for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PendingScore {
    /// Nothing entered.
    #[default]
    Empty,
    /// A bare minus sign, the start of a negative number.
    Minus,
    /// A complete integer entry.
    Value(i64),
}

impl PendingScore {
    /// Parse raw entry text. Returns `None` for anything that is not blank,
    /// a lone minus sign, or an integer.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(PendingScore::Empty);
        }
        if trimmed == "-" {
            return Some(PendingScore::Minus);
        }
        trimmed.parse().ok().map(PendingScore::Value)
    }

    /// The cell this entry commits to: blanks commit as zero, an unfinished
    /// minus sign is kept as raw text.
    fn commit(self) -> ScoreCell {
        match self {
            PendingScore::Empty => ScoreCell::Number(0),
            PendingScore::Minus => ScoreCell::Text("-".into()),
            PendingScore::Value(value) => ScoreCell::Number(value),
        }
    }
}

impl std::fmt::Display for PendingScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingScore::Empty => Ok(()),
            PendingScore::Minus => f.write_str("-"),
            PendingScore::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Error raised when an operation addresses a player or round that does not
/// exist on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Player index outside the sheet.
    #[error("no player at index {index} (sheet has {count})")]
    PlayerOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of players on the sheet.
        count: usize,
    },
    /// Round index outside the sheet.
    #[error("no round at index {index} (sheet has {count})")]
    RoundOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of committed rounds.
        count: usize,
    },
}

/// The in-progress game: per-player score columns, headers, pending inputs,
/// and wild-round flags.
///
/// All columns always have equal length, and headers and inputs stay
/// aligned with the columns. Every mutation preserves this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSheet {
    columns: Vec<Vec<ScoreCell>>,
    headers: Vec<String>,
    inputs: Vec<PendingScore>,
    wild_round: bool,
    wild_rounds: Vec<bool>,
}

impl Default for ScoreSheet {
    fn default() -> Self {
        Self {
            columns: vec![Vec::new()],
            headers: vec![default_header(0)],
            inputs: vec![PendingScore::Empty],
            wild_round: false,
            wild_rounds: Vec::new(),
        }
    }
}

/// Default display name for the player at `index`.
fn default_header(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// Sum of the numeric-parseable cells in a column; blanks and unparsable
/// text contribute zero.
pub fn column_total(cells: &[ScoreCell]) -> i64 {
    cells.iter().filter_map(ScoreCell::numeric).sum()
}

impl ScoreSheet {
    /// Rebuild a sheet from its parts, validating the shape invariant.
    ///
    /// Returns `None` when the parts are inconsistent (unequal column
    /// lengths or misaligned headers/inputs/wild flags); persisted records
    /// that fail here are treated as absent by the caller.
    pub fn from_parts(
        columns: Vec<Vec<ScoreCell>>,
        headers: Vec<String>,
        inputs: Vec<PendingScore>,
        wild_rounds: Vec<bool>,
    ) -> Option<Self> {
        if columns.is_empty() || headers.len() != columns.len() || inputs.len() != columns.len() {
            return None;
        }
        let rounds = columns[0].len();
        if columns.iter().any(|column| column.len() != rounds) {
            return None;
        }
        if wild_rounds.len() != rounds {
            return None;
        }
        Some(Self {
            columns,
            headers,
            inputs,
            wild_round: false,
            wild_rounds,
        })
    }

    /// Number of players on the sheet.
    pub fn player_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of committed rounds.
    pub fn round_count(&self) -> usize {
        self.columns[0].len()
    }

    /// Per-player score columns, chronological order.
    pub fn columns(&self) -> &[Vec<ScoreCell>] {
        &self.columns
    }

    /// Player display names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Pending entries, one per player.
    pub fn inputs(&self) -> &[PendingScore] {
        &self.inputs
    }

    /// Wild flags for the committed rounds.
    pub fn wild_rounds(&self) -> &[bool] {
        &self.wild_rounds
    }

    /// Whether the round currently being entered is flagged wild.
    pub fn wild_round_pending(&self) -> bool {
        self.wild_round
    }

    /// Whether the committed round at `round` was flagged wild. Total over
    /// any index: rounds without a recorded flag count as not wild.
    pub fn wild_round_at(&self, round: usize) -> bool {
        self.wild_rounds.get(round).copied().unwrap_or(false)
    }

    /// The committed cell for `player` at `round`.
    pub fn cell(&self, player: usize, round: usize) -> Result<&ScoreCell, SheetError> {
        let column = self.column(player)?;
        column.get(round).ok_or(SheetError::RoundOutOfRange {
            index: round,
            count: self.round_count(),
        })
    }

    /// Store pending entry text for a player. Returns whether the text was
    /// accepted; anything that is not blank, `"-"`, or an integer is
    /// rejected and the prior entry kept.
    pub fn record_input(&mut self, player: usize, raw: &str) -> Result<bool, SheetError> {
        self.ensure_player(player)?;
        match PendingScore::parse(raw) {
            Some(entry) => {
                self.inputs[player] = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Commit the pending entries as a new round: every blank counts as
    /// zero, the wild flag is recorded, and the entry row resets.
    pub fn commit_round(&mut self) {
        for (column, input) in self.columns.iter_mut().zip(&mut self.inputs) {
            column.push(input.commit());
            *input = PendingScore::Empty;
        }
        self.wild_rounds.push(self.wild_round);
        self.wild_round = false;
    }

    /// Replace a player's display name.
    pub fn set_header(&mut self, player: usize, text: impl Into<String>) -> Result<(), SheetError> {
        self.ensure_player(player)?;
        self.headers[player] = text.into();
        Ok(())
    }

    /// Flag or unflag the round currently being entered as wild.
    pub fn set_wild_round(&mut self, wild: bool) {
        self.wild_round = wild;
    }

    /// Grow or shrink the sheet to `count` players. New columns are filled
    /// with zeros up to the longest existing column, new players get default
    /// headers and blank entries; shrinking discards the dropped players'
    /// data outright. Counts of zero are ignored. Returns whether the sheet
    /// changed.
    pub fn set_player_count(&mut self, count: usize) -> bool {
        let current = self.player_count();
        if count == 0 || count == current {
            return false;
        }
        if count > current {
            let rounds = self
                .columns
                .iter()
                .map(Vec::len)
                .max()
                .unwrap_or_default();
            for index in current..count {
                self.columns.push(vec![ScoreCell::Number(0); rounds]);
                self.headers.push(default_header(index));
                self.inputs.push(PendingScore::Empty);
            }
        } else {
            self.columns.truncate(count);
            self.headers.truncate(count);
            self.inputs.truncate(count);
        }
        true
    }

    /// Delete one committed round from every column and the wild flags.
    pub fn remove_round(&mut self, round: usize) -> Result<(), SheetError> {
        self.ensure_round(round)?;
        for column in &mut self.columns {
            column.remove(round);
        }
        if round < self.wild_rounds.len() {
            self.wild_rounds.remove(round);
        }
        Ok(())
    }

    /// Overwrite a committed cell. The text rule matches [`record_input`]:
    /// blank, `"-"`, and integers are accepted; anything else is rejected
    /// with the prior value kept. Returns whether the text was accepted.
    ///
    /// [`record_input`]: ScoreSheet::record_input
    pub fn edit_score(
        &mut self,
        player: usize,
        round: usize,
        raw: &str,
    ) -> Result<bool, SheetError> {
        self.ensure_player(player)?;
        self.ensure_round(round)?;
        let Some(entry) = PendingScore::parse(raw) else {
            return Ok(false);
        };
        self.columns[player][round] = match entry {
            PendingScore::Empty => ScoreCell::Text(String::new()),
            PendingScore::Minus => ScoreCell::Text("-".into()),
            PendingScore::Value(value) => ScoreCell::Number(value),
        };
        Ok(true)
    }

    /// Running total for a player's column.
    pub fn column_total(&self, player: usize) -> Result<i64, SheetError> {
        Ok(column_total(self.column(player)?))
    }

    /// Zero every committed score in place (round count preserved), clear
    /// the pending entries and all wild flags.
    pub fn reset_scores(&mut self) {
        for column in &mut self.columns {
            for cell in column.iter_mut() {
                *cell = ScoreCell::Number(0);
            }
        }
        for input in &mut self.inputs {
            *input = PendingScore::Empty;
        }
        self.wild_rounds.clear();
        self.wild_round = false;
    }

    fn column(&self, player: usize) -> Result<&Vec<ScoreCell>, SheetError> {
        self.columns.get(player).ok_or(SheetError::PlayerOutOfRange {
            index: player,
            count: self.player_count(),
        })
    }

    fn ensure_player(&self, player: usize) -> Result<(), SheetError> {
        self.column(player).map(|_| ())
    }

    fn ensure_round(&self, round: usize) -> Result<(), SheetError> {
        if round < self.round_count() {
            Ok(())
        } else {
            Err(SheetError::RoundOutOfRange {
                index: round,
                count: self.round_count(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_rounds(rounds: &[&[i64]]) -> ScoreSheet {
        let mut sheet = ScoreSheet::default();
        sheet.set_player_count(rounds.first().map_or(1, |round| round.len()));
        for round in rounds {
            for (player, score) in round.iter().enumerate() {
                assert!(sheet.record_input(player, &score.to_string()).unwrap());
            }
            sheet.commit_round();
        }
        sheet
    }

    #[test]
    fn default_sheet_has_one_blank_player() {
        let sheet = ScoreSheet::default();
        assert_eq!(sheet.player_count(), 1);
        assert_eq!(sheet.round_count(), 0);
        assert_eq!(sheet.headers(), ["Column 1"]);
        assert_eq!(sheet.inputs(), [PendingScore::Empty]);
    }

    #[test]
    fn record_input_accepts_blank_minus_and_integers() {
        let mut sheet = ScoreSheet::default();
        assert!(sheet.record_input(0, "12").unwrap());
        assert_eq!(sheet.inputs()[0], PendingScore::Value(12));
        assert!(sheet.record_input(0, "-").unwrap());
        assert_eq!(sheet.inputs()[0], PendingScore::Minus);
        assert!(sheet.record_input(0, "-7").unwrap());
        assert_eq!(sheet.inputs()[0], PendingScore::Value(-7));
        assert!(sheet.record_input(0, "").unwrap());
        assert_eq!(sheet.inputs()[0], PendingScore::Empty);
    }

    #[test]
    fn record_input_rejects_garbage_keeping_prior_entry() {
        let mut sheet = ScoreSheet::default();
        assert!(sheet.record_input(0, "5").unwrap());
        for raw in ["abc", "1.5", "--", "5x"] {
            assert!(!sheet.record_input(0, raw).unwrap(), "accepted {raw:?}");
            assert_eq!(sheet.inputs()[0], PendingScore::Value(5));
        }
    }

    #[test]
    fn record_input_out_of_range_is_reported() {
        let mut sheet = ScoreSheet::default();
        assert_eq!(
            sheet.record_input(3, "1"),
            Err(SheetError::PlayerOutOfRange { index: 3, count: 1 })
        );
    }

    #[test]
    fn commit_round_substitutes_zero_for_blanks_and_keeps_shape() {
        let mut sheet = ScoreSheet::default();
        sheet.set_player_count(3);
        sheet.record_input(0, "4").unwrap();
        sheet.record_input(2, "-").unwrap();
        sheet.set_wild_round(true);
        sheet.commit_round();

        assert_eq!(sheet.cell(0, 0).unwrap(), &ScoreCell::Number(4));
        assert_eq!(sheet.cell(1, 0).unwrap(), &ScoreCell::Number(0));
        assert_eq!(sheet.cell(2, 0).unwrap(), &ScoreCell::Text("-".into()));
        assert!(sheet.wild_round_at(0));
        assert!(!sheet.wild_round_pending());
        assert_eq!(sheet.inputs(), [PendingScore::Empty; 3]);

        for _ in 0..3 {
            sheet.commit_round();
        }
        for player in 0..sheet.player_count() {
            assert_eq!(sheet.columns()[player].len(), sheet.round_count());
        }
        assert_eq!(sheet.wild_rounds().len(), sheet.round_count());
    }

    #[test]
    fn column_total_ignores_non_numeric_cells() {
        let cells = [
            ScoreCell::Text("5".into()),
            ScoreCell::Text(String::new()),
            ScoreCell::Text("-2".into()),
            ScoreCell::Text("abc".into()),
        ];
        assert_eq!(column_total(&cells), 3);
    }

    #[test]
    fn column_total_mixes_committed_and_edited_cells() {
        let mut sheet = sheet_with_rounds(&[&[5], &[-2]]);
        sheet.edit_score(0, 1, "-").unwrap();
        assert_eq!(sheet.column_total(0).unwrap(), 5);
    }

    #[test]
    fn band_edges() {
        assert_eq!(ScoreBand::for_score(-1), ScoreBand::Green);
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Green);
        assert_eq!(ScoreBand::for_score(14), ScoreBand::White);
        assert_eq!(ScoreBand::for_score(15), ScoreBand::Yellow);
        assert_eq!(ScoreBand::for_score(24), ScoreBand::Yellow);
        assert_eq!(ScoreBand::for_score(25), ScoreBand::Red);
        assert_eq!(ScoreCell::Text("x".into()).band(), None);
        assert_eq!(
            ScoreCell::Number(1).band(),
            Some(ScoreBand::White)
        );
    }

    #[test]
    fn growing_fills_zero_rows_and_numbers_headers() {
        let mut sheet = sheet_with_rounds(&[&[3, 4], &[1, 2]]);
        assert!(sheet.set_player_count(4));
        assert_eq!(sheet.player_count(), 4);
        assert_eq!(sheet.headers()[2], "Column 3");
        assert_eq!(sheet.headers()[3], "Column 4");
        for player in 2..4 {
            assert_eq!(sheet.columns()[player], vec![ScoreCell::Number(0); 2]);
        }
        assert_eq!(sheet.inputs().len(), 4);
    }

    #[test]
    fn shrink_discards_exactly_the_dropped_players() {
        let mut sheet = sheet_with_rounds(&[&[3, 4]]);
        sheet.set_header(1, "Rosa").unwrap();
        let before = sheet.clone();

        sheet.set_player_count(4);
        sheet.set_player_count(2);

        assert_eq!(sheet, before);

        sheet.set_player_count(1);
        assert_eq!(sheet.player_count(), 1);
        sheet.set_player_count(2);
        // The dropped player's data is gone, not restored.
        assert_eq!(sheet.headers()[1], "Column 2");
        assert_eq!(sheet.columns()[1], vec![ScoreCell::Number(0)]);
    }

    #[test]
    fn player_count_zero_or_unchanged_is_a_no_op() {
        let mut sheet = sheet_with_rounds(&[&[3, 4]]);
        assert!(!sheet.set_player_count(0));
        assert!(!sheet.set_player_count(2));
        assert_eq!(sheet.player_count(), 2);
    }

    #[test]
    fn remove_round_drops_the_row_everywhere() {
        let mut sheet = sheet_with_rounds(&[&[1, 2], &[3, 4], &[5, 6]]);
        sheet.set_wild_round(true);
        sheet.commit_round();

        sheet.remove_round(1).unwrap();
        assert_eq!(sheet.round_count(), 3);
        assert_eq!(sheet.cell(0, 1).unwrap(), &ScoreCell::Number(5));
        assert_eq!(sheet.cell(1, 1).unwrap(), &ScoreCell::Number(6));
        assert_eq!(sheet.wild_rounds(), [false, false, true]);

        assert_eq!(
            sheet.remove_round(9),
            Err(SheetError::RoundOutOfRange { index: 9, count: 3 })
        );
    }

    #[test]
    fn edit_score_applies_the_input_text_rule() {
        let mut sheet = sheet_with_rounds(&[&[7]]);
        assert!(sheet.edit_score(0, 0, "11").unwrap());
        assert_eq!(sheet.cell(0, 0).unwrap(), &ScoreCell::Number(11));
        assert!(sheet.edit_score(0, 0, "").unwrap());
        assert_eq!(sheet.cell(0, 0).unwrap(), &ScoreCell::Text(String::new()));
        assert!(!sheet.edit_score(0, 0, "nope").unwrap());
        assert_eq!(sheet.cell(0, 0).unwrap(), &ScoreCell::Text(String::new()));
    }

    #[test]
    fn reset_scores_zeroes_in_place_and_clears_wild_flags() {
        let mut sheet = sheet_with_rounds(&[&[9, -1], &[25, 3]]);
        sheet.set_wild_round(true);
        sheet.record_input(0, "8").unwrap();
        sheet.reset_scores();

        assert_eq!(sheet.round_count(), 2);
        for column in sheet.columns() {
            assert!(column.iter().all(|cell| cell == &ScoreCell::Number(0)));
        }
        assert_eq!(sheet.inputs(), [PendingScore::Empty; 2]);
        assert!(sheet.wild_rounds().is_empty());
        assert!(!sheet.wild_round_pending());
        // Wild lookups stay total after the flags were cleared.
        assert!(!sheet.wild_round_at(1));
    }

    #[test]
    fn from_parts_rejects_inconsistent_shapes() {
        let columns = vec![vec![ScoreCell::Number(1)], vec![]];
        assert!(
            ScoreSheet::from_parts(
                columns,
                vec!["A".into(), "B".into()],
                vec![PendingScore::Empty; 2],
                vec![false],
            )
            .is_none()
        );

        let columns = vec![vec![ScoreCell::Number(1)]];
        assert!(
            ScoreSheet::from_parts(
                columns.clone(),
                vec!["A".into()],
                vec![PendingScore::Empty],
                vec![],
            )
            .is_none()
        );
        assert!(
            ScoreSheet::from_parts(
                columns,
                vec!["A".into()],
                vec![PendingScore::Empty],
                vec![true],
            )
            .is_some()
        );
    }
}
