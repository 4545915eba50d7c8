//! Unified error types for the domain layer
//!
//! Every command method on an aggregate returns `Result<_, DomainError>`.
//! A failed command leaves the aggregate and its pending events untouched,
//! so callers can surface the error without any compensation step.

use thiserror::Error;

use crate::ids::{BetId, MatchId, PlayerId};

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed while constructing a value or aggregate
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The player is already on the match roster
    #[error("Player {player_id} already joined match {match_id}")]
    DuplicatePlayer {
        match_id: MatchId,
        player_id: PlayerId,
    },

    /// The roster is full, so the match has already started (or finished)
    #[error("Match {match_id} is full: {max_players} players already joined")]
    MatchAlreadyStarted { match_id: MatchId, max_players: u32 },

    /// The match has no session yet
    #[error("Match {0} has not started yet")]
    MatchNotStarted(MatchId),

    /// The session is still running
    #[error("Session of match {0} is not over yet")]
    SessionNotOver(MatchId),

    /// The session window has closed
    #[error("Session of match {0} is over")]
    SessionOver(MatchId),

    /// `finish` was already applied
    #[error("Match {0} is already finished")]
    MatchAlreadyFinished(MatchId),

    /// The player does not take part in this match or field
    #[error("Player {player_id} does not take part in match {match_id}")]
    PlayerNotFound {
        match_id: MatchId,
        player_id: PlayerId,
    },

    /// The bet already has a winner
    #[error("Bet {0} is already finished")]
    BetAlreadyFinished(BetId),

    /// The proposed winner did not place the bet
    #[error("Player {player_id} is not a participant of bet {bet_id}")]
    UnknownWinner { bet_id: BetId, player_id: PlayerId },
}

impl DomainError {
    /// Creates a validation error for invariants checked at construction.
    ///
    /// # Example
    /// ```ignore
    /// if size < 2 {
    ///     return Err(DomainError::validation("Field size must be greater than 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a player not found error
    pub fn player_not_found(match_id: &MatchId, player_id: &PlayerId) -> Self {
        Self::PlayerNotFound {
            match_id: match_id.clone(),
            player_id: player_id.clone(),
        }
    }

    /// Short machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicatePlayer { .. } => "duplicate_player",
            Self::MatchAlreadyStarted { .. } => "match_already_started",
            Self::MatchNotStarted(_) => "match_not_started",
            Self::SessionNotOver(_) => "session_not_over",
            Self::SessionOver(_) => "session_over",
            Self::MatchAlreadyFinished(_) => "match_already_finished",
            Self::PlayerNotFound { .. } => "player_not_found",
            Self::BetAlreadyFinished(_) => "bet_already_finished",
            Self::UnknownWinner { .. } => "unknown_winner",
        }
    }
}
