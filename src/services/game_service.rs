use time::OffsetDateTime;
use tracing::info;

use crate::{
    dao::{ArchiveStore, GameStateStore, models::ArchivedGameEntity},
    error::ServiceError,
    ui::NamePrompt,
};

/// Commit the pending entry row as a new round.
pub fn add_score(game: &mut GameStateStore) -> Result<(), ServiceError> {
    game.commit_round()?;
    Ok(())
}

/// Finalize the current game into the archive.
///
/// The name comes from the injected prompt; a cancelled or empty prompt
/// aborts with no state change. On success the sheet's scores are zeroed in
/// place and its persisted record dropped, and the archived copy is
/// returned.
pub fn save_game(
    game: &mut GameStateStore,
    archive: &mut ArchiveStore,
    prompt: &dyn NamePrompt,
) -> Result<Option<ArchivedGameEntity>, ServiceError> {
    let Some(name) = prompt.request_name() else {
        return Ok(None);
    };
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Ok(None);
    }

    let sheet = game.sheet();
    let entry = ArchivedGameEntity {
        name,
        date: OffsetDateTime::now_utc(),
        columns: sheet.columns().to_vec(),
        headers: sheet.headers().to_vec(),
        wild_rounds: sheet.wild_rounds().to_vec(),
    };

    archive.push(entry.clone())?;
    game.reset_after_save()?;
    info!(name = %entry.name, rounds = entry.wild_rounds.len(), "archived game");
    Ok(Some(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::MemoryStore;
    use crate::state::ScoreCell;
    use std::sync::Arc;

    struct FixedName(Option<&'static str>);

    impl NamePrompt for FixedName {
        fn request_name(&self) -> Option<String> {
            self.0.map(str::to_owned)
        }
    }

    fn stores() -> (GameStateStore, ArchiveStore) {
        let backend = Arc::new(MemoryStore::new());
        (
            GameStateStore::open(backend.clone()).unwrap(),
            ArchiveStore::open(backend).unwrap(),
        )
    }

    #[test]
    fn cancelled_or_blank_name_aborts_without_changes() {
        let (mut game, mut archive) = stores();
        game.record_input(0, "6").unwrap();
        game.commit_round().unwrap();

        for prompt in [FixedName(None), FixedName(Some("   "))] {
            assert!(save_game(&mut game, &mut archive, &prompt).unwrap().is_none());
        }
        assert!(archive.is_empty());
        assert_eq!(game.sheet().cell(0, 0).unwrap(), &ScoreCell::Number(6));
    }

    #[test]
    fn save_archives_a_frozen_copy_and_resets_the_sheet() {
        let (mut game, mut archive) = stores();
        game.set_player_count(2).unwrap();
        game.record_input(0, "9").unwrap();
        game.record_input(1, "-3").unwrap();
        game.set_wild_round(true);
        game.commit_round().unwrap();
        game.set_header(0, "Ada").unwrap();

        let saved = save_game(&mut game, &mut archive, &FixedName(Some("night one")))
            .unwrap()
            .expect("game should be archived");

        assert_eq!(saved.name, "night one");
        assert_eq!(saved.headers, ["Ada", "Column 2"]);
        assert_eq!(saved.columns[0], [ScoreCell::Number(9)]);
        assert_eq!(saved.columns[1], [ScoreCell::Number(-3)]);
        assert_eq!(saved.wild_rounds, [true]);

        assert_eq!(archive.len(), 1);
        // Shape preserved, scores zeroed, wild flags gone.
        assert_eq!(game.sheet().round_count(), 1);
        assert_eq!(game.sheet().cell(1, 0).unwrap(), &ScoreCell::Number(0));
        assert!(game.sheet().wild_rounds().is_empty());
    }

    #[test]
    fn saved_game_survives_an_export_import_round_trip() {
        let (mut game, mut archive) = stores();
        game.set_player_count(2).unwrap();
        game.record_input(0, "14").unwrap();
        game.record_input(1, "25").unwrap();
        game.set_wild_round(true);
        game.commit_round().unwrap();

        let saved = save_game(&mut game, &mut archive, &FixedName(Some("exported")))
            .unwrap()
            .unwrap();
        let document = archive.export_document().unwrap();

        let (_, mut restored) = stores();
        restored.import_document(&document).unwrap();
        let imported = restored.list_by_date_desc().next().unwrap();
        assert_eq!(imported, &saved);
    }

    #[test]
    fn archived_copy_is_frozen_against_later_edits() {
        let (mut game, mut archive) = stores();
        game.record_input(0, "4").unwrap();
        game.commit_round().unwrap();
        save_game(&mut game, &mut archive, &FixedName(Some("frozen")))
            .unwrap()
            .unwrap();

        game.record_input(0, "21").unwrap();
        game.commit_round().unwrap();

        let archived = archive.list_by_date_desc().next().unwrap();
        assert_eq!(archived.columns[0], [ScoreCell::Number(4)]);
    }
}
