use time::OffsetDateTime;

use crate::{dao::models::ArchivedGameEntity, state::column_total};

/// One player's final standing in an archived game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTotal {
    /// Player display name.
    pub name: String,
    /// Final column total.
    pub total: i64,
}

/// List-item projection of an archived game: name, save date, and final
/// totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// User-supplied game name.
    pub name: String,
    /// Save timestamp.
    pub date: OffsetDateTime,
    /// Final totals in player order.
    pub totals: Vec<PlayerTotal>,
}

impl From<&ArchivedGameEntity> for GameSummary {
    fn from(game: &ArchivedGameEntity) -> Self {
        let totals = game
            .headers
            .iter()
            .zip(&game.columns)
            .map(|(name, column)| PlayerTotal {
                name: name.clone(),
                total: column_total(column),
            })
            .collect();
        Self {
            name: game.name.clone(),
            date: game.date,
            totals,
        }
    }
}
