//! Bet events.

use serde::{Deserialize, Serialize};

use crate::ids::{BetId, MatchId, PlayerId};

/// A bet was resolved in favour of `winner_player_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetFinishedEvent {
    pub bet_id: BetId,
    pub game_id: MatchId,
    pub winner_player_id: PlayerId,
    pub amount: f64,
}
