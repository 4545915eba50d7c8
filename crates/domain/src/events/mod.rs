//! Domain Events
//!
//! Immutable records of state changes, produced by aggregate commands and
//! handed to the engine for delivery. Each aggregate queues its own event
//! type (`MatchEvent`, `FieldEvent`, `BetFinishedEvent`); all of them convert
//! into the crate-wide `DomainEvent` that travels over the event bus.
//!
//! ## Mutation Outcomes
//!
//! Commands also return outcome values (`JoinOutcome`, `HitOutcome`,
//! `ScoreChange`) telling the caller what happened without draining events.

pub mod bet_events;
pub mod field_events;
pub mod match_events;
pub mod queue;

pub use bet_events::*;
pub use field_events::*;
pub use match_events::*;
pub use queue::EventQueue;

use serde::{Deserialize, Serialize};

use crate::ids::MatchId;

/// Domain event for significant state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    MatchStarted(MatchStartedEvent),
    MatchFinished(MatchFinishedEvent),
    MarkedCellHit(MarkedCellHitEvent),
    FieldMarkedCellPositionChanged(FieldMarkedCellPositionChanged),
    BetFinished(BetFinishedEvent),
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MatchStarted(_) => "match_started",
            Self::MatchFinished(_) => "match_finished",
            Self::MarkedCellHit(_) => "marked_cell_hit",
            Self::FieldMarkedCellPositionChanged(_) => "field_marked_cell_position_changed",
            Self::BetFinished(_) => "bet_finished",
        }
    }

    /// The match every event ultimately belongs to.
    pub fn game_id(&self) -> &MatchId {
        match self {
            Self::MatchStarted(e) => &e.match_id,
            Self::MatchFinished(e) => &e.match_id,
            Self::MarkedCellHit(e) => &e.game_id,
            Self::FieldMarkedCellPositionChanged(e) => &e.game_id,
            Self::BetFinished(e) => &e.game_id,
        }
    }
}

impl From<MatchEvent> for DomainEvent {
    fn from(event: MatchEvent) -> Self {
        match event {
            MatchEvent::Started(e) => Self::MatchStarted(e),
            MatchEvent::Finished(e) => Self::MatchFinished(e),
        }
    }
}

impl From<FieldEvent> for DomainEvent {
    fn from(event: FieldEvent) -> Self {
        match event {
            FieldEvent::MarkedCellHit(e) => Self::MarkedCellHit(e),
            FieldEvent::MarkedCellPositionChanged(e) => Self::FieldMarkedCellPositionChanged(e),
        }
    }
}

impl From<BetFinishedEvent> for DomainEvent {
    fn from(event: BetFinishedEvent) -> Self {
        Self::BetFinished(event)
    }
}
