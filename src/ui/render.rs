//! Plain-text rendering of the live sheet and archived games.
//!
//! The stored order of rounds is chronological; the live table prints the
//! newest round first, which is a display reversal only. Archived games are
//! shown in chronological order.

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    dao::models::ArchivedGameEntity,
    dto::GameSummary,
    state::{ScoreCell, ScoreSheet, column_total},
};

const DATE_DISPLAY: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day padding:zero], [year]");

/// Format a save date the way the archive list shows it, e.g.
/// `June 01, 2024`.
pub fn display_date(date: OffsetDateTime) -> String {
    date.format(&DATE_DISPLAY).unwrap_or_else(|_| date.to_string())
}

/// One archive list line: name, date, and final totals.
pub fn summary_line(summary: &GameSummary) -> String {
    let totals = summary
        .totals
        .iter()
        .map(|player| format!("{}: {}", player.name, player.total))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} — {} — {}",
        summary.name,
        display_date(summary.date),
        totals
    )
}

/// The live sheet as a table: header row, pending entry row, committed
/// rounds newest first, totals last.
pub fn score_table(sheet: &ScoreSheet) -> String {
    let mut rows = Vec::new();

    let mut header = vec!["#".to_owned()];
    header.extend(sheet.headers().iter().cloned());
    rows.push(header);

    let mut entry = vec![if sheet.wild_round_pending() {
        ">*".to_owned()
    } else {
        ">".to_owned()
    }];
    entry.extend(sheet.inputs().iter().map(ToString::to_string));
    rows.push(entry);

    for round in (0..sheet.round_count()).rev() {
        let mut row = vec![round_label(round, sheet.wild_round_at(round))];
        for column in sheet.columns() {
            row.push(cell_text(&column[round]));
        }
        rows.push(row);
    }

    let mut totals = vec!["Totals".to_owned()];
    for column in sheet.columns() {
        totals.push(column_total(column).to_string());
    }
    rows.push(totals);

    align(&rows)
}

/// An archived game as a table: rounds in chronological order, totals last.
pub fn archived_table(game: &ArchivedGameEntity) -> String {
    let mut rows = Vec::new();

    let mut header = vec!["#".to_owned()];
    header.extend(game.headers.iter().cloned());
    rows.push(header);

    let rounds = game.columns.first().map_or(0, Vec::len);
    for round in 0..rounds {
        let wild = game.wild_rounds.get(round).copied().unwrap_or(false);
        let mut row = vec![round_label(round, wild)];
        for column in &game.columns {
            row.push(cell_text(&column[round]));
        }
        rows.push(row);
    }

    let mut totals = vec!["Totals".to_owned()];
    for column in &game.columns {
        totals.push(column_total(column).to_string());
    }
    rows.push(totals);

    format!(
        "{} — {}\n{}",
        game.name,
        display_date(game.date),
        align(&rows)
    )
}

/// Round label, 1-based, with the wild marker.
fn round_label(round: usize, wild: bool) -> String {
    if wild {
        format!("{}*", round + 1)
    } else {
        (round + 1).to_string()
    }
}

/// Cell text with its display band, e.g. `15 (yellow)`; non-numeric cells
/// render bare.
fn cell_text(cell: &ScoreCell) -> String {
    match cell.band() {
        Some(band) => format!("{cell} ({})", band.name()),
        None => cell.to_string(),
    }
}

/// Pad every column of `rows` to a common width.
fn align(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|index| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(String::len)
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(index, text)| format!("{text:>width$}", width = widths[index]))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
