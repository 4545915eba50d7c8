//! Field events and hit outcomes.

use serde::{Deserialize, Serialize};

use crate::ids::{FieldId, MatchId, PlayerId};

/// A player hit the marked cell. `cell_position` is the cell that was hit,
/// not the one the mark moved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedCellHitEvent {
    pub player_id: PlayerId,
    pub game_id: MatchId,
    pub cell_position: u32,
}

/// The mark moved on its own (periodic relocation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMarkedCellPositionChanged {
    pub new_position: u32,
    pub game_id: MatchId,
    pub field_id: FieldId,
}

/// Events a `Field` can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    MarkedCellHit(MarkedCellHitEvent),
    MarkedCellPositionChanged(FieldMarkedCellPositionChanged),
}

/// Result of a hit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The marked cell was hit and the mark moved to `new_position`
    Hit { new_position: u32 },
    /// Wrong cell, nothing changed
    Miss,
}

impl HitOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}
