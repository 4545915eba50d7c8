//! Player - a roster entry of a match

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::value_objects::PlayerName;

/// A player taking part in a match.
///
/// The score is only ever raised by the owning `Match`, which checks that
/// the session is running first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: PlayerName,
    score: u32,
}

impl Player {
    /// Create a player with a zero score.
    pub fn create(id: PlayerId, name: PlayerName) -> Self {
        Self { id, name, score: 0 }
    }

    #[inline]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn increase_score(&mut self) -> u32 {
        self.score = self.score.saturating_add(1);
        self.score
    }
}
