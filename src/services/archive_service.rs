use tracing::warn;

use crate::{
    dao::{ArchiveStore, ImportError, models::ArchivedGameEntity},
    error::ServiceError,
    ui::{ClipboardWriter, Confirm, Notifier},
};

/// Delete an archived game after user confirmation. Returns whether the
/// game was removed (declined confirmation and absent targets both leave
/// the archive untouched).
pub fn delete_game(
    archive: &mut ArchiveStore,
    target: &ArchivedGameEntity,
    confirm: &dyn Confirm,
) -> Result<bool, ServiceError> {
    if !confirm.confirm("Are you sure you want to delete this game?") {
        return Ok(false);
    }
    Ok(archive.delete(target)?)
}

/// Export the archive to the clipboard collaborator and report the outcome.
pub fn export_archive(
    archive: &ArchiveStore,
    clipboard: &dyn ClipboardWriter,
    notifier: &dyn Notifier,
) -> Result<(), ServiceError> {
    let document = archive.export_document()?;
    match clipboard.write(&document) {
        Ok(()) => notifier.notify("Archive copied."),
        Err(err) => {
            warn!(error = %err, "clipboard write failed");
            notifier.error(&format!("could not hand over the export: {err}"));
        }
    }
    Ok(())
}

/// Replace the archive from an interchange document.
///
/// A document that does not parse leaves the archive untouched; the user is
/// notified either way and the error is still returned to the caller.
pub fn import_archive(
    archive: &mut ArchiveStore,
    document: &str,
    notifier: &dyn Notifier,
) -> Result<usize, ServiceError> {
    match archive.import_document(document) {
        Ok(count) => {
            notifier.notify(&format!("Imported {count} games."));
            Ok(count)
        }
        Err(err) => {
            if matches!(err, ImportError::Malformed(_)) {
                notifier.error("Import failed: the document is not a valid archive.");
            }
            Err(err.into())
        }
    }
}
