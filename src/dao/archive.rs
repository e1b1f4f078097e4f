use std::{cmp::Reverse, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};

use crate::dao::{
    kv::KeyValueStore,
    models::ArchivedGameEntity,
    storage::{StorageError, StorageResult},
};

/// Storage key of the archive record.
pub const ARCHIVE_KEY: &str = "pastGames";

/// Errors surfaced when replacing the archive from an interchange document.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not a well-formed archive; nothing was changed.
    #[error("import document is not a valid archive: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The parsed archive could not be flushed to the backend.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The collection of finalized games, bound to an injected persistence
/// backend.
///
/// Games are kept in insertion order; the date-descending view the display
/// layer wants is derived at read time. Every mutation flushes the whole
/// list.
pub struct ArchiveStore {
    games: Vec<ArchivedGameEntity>,
    backend: Arc<dyn KeyValueStore>,
}

impl ArchiveStore {
    /// Restore the archive from `backend`, falling back to an empty list
    /// when no record exists or the stored record is malformed.
    pub fn open(backend: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let games = match backend.read(ARCHIVE_KEY)? {
            Some(document) => match serde_json::from_str(&document) {
                Ok(games) => games,
                Err(err) => {
                    warn!(error = %err, "stored archive is malformed; starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(Self { games, backend })
    }

    /// Number of archived games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the archive holds no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// The archived games, date descending. Games saved at the same instant
    /// keep their insertion order. Each call restarts the sequence.
    pub fn list_by_date_desc(&self) -> impl Iterator<Item = &ArchivedGameEntity> {
        let mut order: Vec<&ArchivedGameEntity> = self.games.iter().collect();
        order.sort_by_key(|game| Reverse(game.date));
        order.into_iter()
    }

    /// Append a finalized game and flush.
    pub fn push(&mut self, game: ArchivedGameEntity) -> StorageResult<()> {
        self.games.push(game);
        self.flush()
    }

    /// Remove the first game equal to `target`. Returns whether a game was
    /// removed; an absent target is a no-op.
    pub fn delete(&mut self, target: &ArchivedGameEntity) -> StorageResult<bool> {
        let Some(position) = self.games.iter().position(|game| game == target) else {
            return Ok(false);
        };
        self.games.remove(position);
        self.flush()?;
        Ok(true)
    }

    /// The full archive as the interchange document (pretty-printed JSON).
    pub fn export_document(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(&self.games).map_err(|source| {
            StorageError::unavailable("cannot serialize the archive".into(), source)
        })
    }

    /// Replace the archive wholesale from an interchange document.
    ///
    /// A document that fails to parse leaves the archive untouched; there is
    /// no partial import. Returns the number of games imported.
    pub fn import_document(&mut self, document: &str) -> Result<usize, ImportError> {
        let games: Vec<ArchivedGameEntity> = serde_json::from_str(document)?;
        let count = games.len();
        self.games = games;
        self.flush()?;
        info!(count, "replaced archive from import document");
        Ok(count)
    }

    fn flush(&self) -> StorageResult<()> {
        let document = serde_json::to_string(&self.games).map_err(|source| {
            StorageError::unavailable("cannot serialize the archive".into(), source)
        })?;
        self.backend.write(ARCHIVE_KEY, &document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::kv::MemoryStore;
    use crate::state::ScoreCell;
    use time::macros::datetime;

    fn memory() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    fn game(name: &str, date: time::OffsetDateTime) -> ArchivedGameEntity {
        ArchivedGameEntity {
            name: name.into(),
            date,
            columns: vec![vec![ScoreCell::Number(3), ScoreCell::Number(18)]],
            headers: vec!["Column 1".into()],
            wild_rounds: vec![false, true],
        }
    }

    #[test]
    fn listing_is_date_descending_with_stable_ties() {
        let mut archive = ArchiveStore::open(memory()).unwrap();
        let tied = datetime!(2024-03-10 9:00 UTC);
        archive.push(game("january", datetime!(2024-01-01 0:00 UTC))).unwrap();
        archive.push(game("june", datetime!(2024-06-01 0:00 UTC))).unwrap();
        archive.push(game("tie-first", tied)).unwrap();
        archive.push(game("tie-second", tied)).unwrap();

        let names: Vec<&str> = archive
            .list_by_date_desc()
            .map(|game| game.name.as_str())
            .collect();
        assert_eq!(names, ["june", "tie-first", "tie-second", "january"]);

        // The sequence restarts on every call.
        assert_eq!(archive.list_by_date_desc().count(), 4);
        assert_eq!(archive.list_by_date_desc().count(), 4);
    }

    #[test]
    fn mutations_are_flushed_and_survive_reopen() {
        let backend = memory();
        {
            let mut archive = ArchiveStore::open(backend.clone()).unwrap();
            archive.push(game("kept", datetime!(2024-05-05 0:00 UTC))).unwrap();
            archive.push(game("dropped", datetime!(2024-05-06 0:00 UTC))).unwrap();
            let dropped = game("dropped", datetime!(2024-05-06 0:00 UTC));
            assert!(archive.delete(&dropped).unwrap());
            assert!(!archive.delete(&dropped).unwrap());
        }
        let archive = ArchiveStore::open(backend).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.list_by_date_desc().next().unwrap().name, "kept");
    }

    #[test]
    fn export_then_import_reproduces_the_archive() {
        let mut archive = ArchiveStore::open(memory()).unwrap();
        archive.push(game("round trip", datetime!(2024-02-02 12:30 UTC))).unwrap();
        let document = archive.export_document().unwrap();

        let mut other = ArchiveStore::open(memory()).unwrap();
        assert_eq!(other.import_document(&document).unwrap(), 1);
        assert_eq!(other.export_document().unwrap(), document);
    }

    #[test]
    fn import_replaces_wholesale() {
        let mut archive = ArchiveStore::open(memory()).unwrap();
        archive.push(game("old", datetime!(2023-01-01 0:00 UTC))).unwrap();

        let incoming = serde_json::to_string(&[game("new", datetime!(2024-01-01 0:00 UTC))]).unwrap();
        archive.import_document(&incoming).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.list_by_date_desc().next().unwrap().name, "new");
    }

    #[test]
    fn malformed_import_leaves_the_archive_untouched() {
        let backend = memory();
        let mut archive = ArchiveStore::open(backend.clone()).unwrap();
        archive.push(game("kept", datetime!(2024-04-04 0:00 UTC))).unwrap();
        let before_memory = archive.export_document().unwrap();
        let before_stored = backend.read(ARCHIVE_KEY).unwrap();

        for document in ["{oops", "[{\"name\":\"x\"}]", "[{\"name\":1}]", "42"] {
            assert!(matches!(
                archive.import_document(document),
                Err(ImportError::Malformed(_))
            ));
        }

        assert_eq!(archive.export_document().unwrap(), before_memory);
        assert_eq!(backend.read(ARCHIVE_KEY).unwrap(), before_stored);
    }

    #[test]
    fn malformed_stored_archive_starts_empty() {
        let backend = memory();
        backend.write(ARCHIVE_KEY, "not an archive").unwrap();
        let archive = ArchiveStore::open(backend).unwrap();
        assert!(archive.is_empty());
    }
}
