//! Whackbet domain layer.
//!
//! The `Match`, `Field` and `Bet` aggregates, the values they share, and the
//! events they emit. Everything here is synchronous and deterministic: time
//! is passed in by the caller and randomness comes from an injected
//! `RandomSource`.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod random;
pub mod value_objects;

pub use aggregates::{Bet, Field, Match, MatchState, MIN_PLAYERS};
pub use entities::Player;
pub use error::DomainError;
pub use events::{
    BetFinishedEvent, DomainEvent, EventQueue, FieldEvent, FieldMarkedCellPositionChanged,
    HitOutcome, JoinOutcome, MarkedCellHitEvent, MatchEvent, MatchFinishedEvent,
    MatchStartedEvent, PlayerScore, ScoreChange,
};
pub use ids::{BetId, FieldId, MatchId, PlayerId};
pub use random::RandomSource;
pub use value_objects::{BetStatus, PlayerName, Session, Stake, MINUTES_TO_PLAY};
