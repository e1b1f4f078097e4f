//! Read-side projections of the stored records for the display layer.

pub mod archive;

pub use self::archive::{GameSummary, PlayerTotal};
