//! Match events and mutation outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, PlayerId};
use crate::value_objects::Session;

/// The roster became full and the session started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStartedEvent {
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub match_id: MatchId,
    pub player_ids: Vec<PlayerId>,
}

impl MatchStartedEvent {
    /// The session the match started, for aggregates that need a copy of it.
    pub fn session(&self) -> Session {
        Session::create(self.duration_minutes, self.started_at)
    }
}

/// Final score of one player, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub id: PlayerId,
    pub score: u32,
}

/// The session ran out and the match was closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFinishedEvent {
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub match_id: MatchId,
    pub players: Vec<PlayerScore>,
    pub finished_at: DateTime<Utc>,
}

impl MatchFinishedEvent {
    /// Highest score in the snapshot; ties go to the earliest joiner.
    pub fn leader(&self) -> Option<&PlayerScore> {
        self.players
            .iter()
            .fold(None, |best: Option<&PlayerScore>, candidate| match best {
                Some(current) if current.score >= candidate.score => Some(current),
                _ => Some(candidate),
            })
    }
}

/// Events a `Match` can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    Started(MatchStartedEvent),
    Finished(MatchFinishedEvent),
}

/// Outcome of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Still waiting for more players
    Waiting { joined: u32, max_players: u32 },
    /// This join filled the roster and started the session
    MatchStarted { session: Session },
}

/// New score after a point was awarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChange {
    pub player_id: PlayerId,
    pub score: u32,
}
