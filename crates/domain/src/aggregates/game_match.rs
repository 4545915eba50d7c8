//! Match aggregate - lobby and timed gameplay
//!
//! # State Machine
//!
//! ```text
//! Created --join (roster full)--> Started --finish (session over)--> Finished
//! ```
//!
//! A match is created with its first player. Joins are accepted until the
//! roster reaches `max_players`; the join that fills it starts a `Session`
//! of `MINUTES_TO_PLAY` minutes. Scores can only rise while that session is
//! running, and the match can be finished exactly once after it has ended.
//!
//! Commands never read the clock: every time-dependent command receives
//! `now` from the caller.

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::entities::Player;
use crate::error::DomainError;
use crate::events::{
    EventQueue, JoinOutcome, MatchEvent, MatchFinishedEvent, MatchStartedEvent, PlayerScore,
    ScoreChange,
};
use crate::ids::{MatchId, PlayerId};
use crate::value_objects::{Session, MINUTES_TO_PLAY};

/// Smallest roster a match can be created for.
pub const MIN_PLAYERS: u32 = 2;

/// Lifecycle phase derived from the session and finish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchState {
    Created,
    Started,
    Finished,
}

/// A match between a fixed number of players
///
/// # Invariants
///
/// - `players.len() <= max_players` and player ids are unique
/// - `session` is present iff the roster is full, and is set once
/// - `finished_at` is only set after the session is over, and is set once
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use whackbet_domain::{Match, MatchId, Player, PlayerId, PlayerName};
///
/// let john = Player::create(PlayerId::from("1"), PlayerName::new("John").unwrap());
/// let mike = Player::create(PlayerId::from("2"), PlayerName::new("Mike").unwrap());
///
/// let mut game = Match::create(MatchId::from("match123"), john, 2).unwrap();
/// assert!(game.session().is_none());
///
/// game.join(mike, Utc::now()).unwrap();
/// assert!(game.session().is_some());
/// assert_eq!(game.events().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    players: Vec<Player>,
    max_players: u32,
    session: Option<Session>,
    finished_at: Option<DateTime<Utc>>,
    events: EventQueue<MatchEvent>,
}

impl Match {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Open a new match with its first player.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `max_players` is below 2.
    pub fn create(id: MatchId, first_player: Player, max_players: u32) -> Result<Self, DomainError> {
        if max_players < MIN_PLAYERS {
            return Err(DomainError::validation(format!(
                "A match needs at least {} players, got {}",
                MIN_PLAYERS, max_players
            )));
        }

        Ok(Self {
            id,
            players: vec![first_player],
            max_players,
            session: None,
            finished_at: None,
            events: EventQueue::new(),
        })
    }

    // =========================================================================
    // Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &MatchId {
        &self.id
    }

    /// Players in join order.
    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id().clone()).collect()
    }

    #[inline]
    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    #[inline]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[inline]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn state(&self) -> MatchState {
        match (&self.session, self.finished_at) {
            (_, Some(_)) => MatchState::Finished,
            (Some(_), None) => MatchState::Started,
            (None, None) => MatchState::Created,
        }
    }

    fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    /// Player with the highest score; ties go to the earliest joiner.
    pub fn leader(&self) -> Option<&Player> {
        self.players
            .iter()
            .fold(None, |best: Option<&Player>, candidate| match best {
                Some(current) if current.score() >= candidate.score() => Some(current),
                _ => Some(candidate),
            })
    }

    /// Events emitted since the last drain, oldest first.
    #[inline]
    pub fn events(&self) -> &[MatchEvent] {
        self.events.events()
    }

    /// Hand the pending events to the caller for dispatch.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        self.events.drain()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Add a player to the lobby. The join that fills the roster starts the
    /// session at `now` and emits `MatchStartedEvent`.
    ///
    /// # Errors
    ///
    /// - `DuplicatePlayer` if the player already joined
    /// - `MatchAlreadyStarted` if the roster is already full
    pub fn join(&mut self, player: Player, now: DateTime<Utc>) -> Result<JoinOutcome, DomainError> {
        if self.player(player.id()).is_some() {
            return Err(DomainError::DuplicatePlayer {
                match_id: self.id.clone(),
                player_id: player.id().clone(),
            });
        }

        if self.is_full() {
            return Err(DomainError::MatchAlreadyStarted {
                match_id: self.id.clone(),
                max_players: self.max_players,
            });
        }

        self.players.push(player);

        if !self.is_full() {
            return Ok(JoinOutcome::Waiting {
                joined: self.players.len() as u32,
                max_players: self.max_players,
            });
        }

        let session = Session::create(MINUTES_TO_PLAY, now);
        self.session = Some(session);
        self.events.push(MatchEvent::Started(MatchStartedEvent {
            duration_minutes: session.duration_minutes(),
            started_at: session.started_at(),
            match_id: self.id.clone(),
            player_ids: self.player_ids(),
        }));

        Ok(JoinOutcome::MatchStarted { session })
    }

    /// Award one point to a player. Emits no event; the returned
    /// `ScoreChange` carries the new score.
    ///
    /// # Errors
    ///
    /// - `MatchNotStarted` if there is no session yet
    /// - `SessionOver` if the session has ended at `now`
    /// - `PlayerNotFound` if the player is not on the roster
    pub fn increase_player_score(
        &mut self,
        player_id: &PlayerId,
        now: DateTime<Utc>,
    ) -> Result<ScoreChange, DomainError> {
        self.ensure_running(now)?;

        let match_id = &self.id;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == player_id)
            .ok_or_else(|| DomainError::player_not_found(match_id, player_id))?;

        let score = player.increase_score();
        Ok(ScoreChange {
            player_id: player_id.clone(),
            score,
        })
    }

    /// Close the match once its session is over and emit the final scores.
    ///
    /// # Errors
    ///
    /// - `MatchNotStarted` if there is no session yet
    /// - `SessionNotOver` if the session is still running at `now`
    /// - `MatchAlreadyFinished` on a second call
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        let session = self
            .session
            .ok_or_else(|| DomainError::MatchNotStarted(self.id.clone()))?;

        if !session.is_over(now) {
            return Err(DomainError::SessionNotOver(self.id.clone()));
        }

        if self.finished_at.is_some() {
            return Err(DomainError::MatchAlreadyFinished(self.id.clone()));
        }

        self.finished_at = Some(now);
        self.events.push(MatchEvent::Finished(MatchFinishedEvent {
            duration_minutes: session.duration_minutes(),
            started_at: session.started_at(),
            match_id: self.id.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerScore {
                    id: p.id().clone(),
                    score: p.score(),
                })
                .collect(),
            finished_at: now,
        }));

        Ok(())
    }

    fn ensure_running(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        let session = self
            .session
            .ok_or_else(|| DomainError::MatchNotStarted(self.id.clone()))?;
        if session.is_over(now) {
            return Err(DomainError::SessionOver(self.id.clone()));
        }
        Ok(())
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Stored shape of a match. Pending events are never persisted.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchWireFormat {
    id: MatchId,
    players: Vec<Player>,
    max_players: u32,
    session: Option<Session>,
    finished_at: Option<DateTime<Utc>>,
}

impl Serialize for Match {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = MatchWireFormat {
            id: self.id.clone(),
            players: self.players.clone(),
            max_players: self.max_players,
            session: self.session,
            finished_at: self.finished_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Match {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = MatchWireFormat::deserialize(deserializer)?;

        if wire.max_players < MIN_PLAYERS {
            return Err(DeError::custom("max_players must be at least 2"));
        }
        if wire.players.is_empty() || wire.players.len() > wire.max_players as usize {
            return Err(DeError::custom("roster size out of bounds"));
        }
        let mut seen = HashSet::new();
        if !wire.players.iter().all(|p| seen.insert(p.id().clone())) {
            return Err(DeError::custom("duplicate player id in roster"));
        }
        let full = wire.players.len() == wire.max_players as usize;
        if full != wire.session.is_some() {
            return Err(DeError::custom("session must exist iff the roster is full"));
        }
        if wire.finished_at.is_some() && wire.session.is_none() {
            return Err(DeError::custom("finished match without a session"));
        }

        Ok(Match {
            id: wire.id,
            players: wire.players,
            max_players: wire.max_players,
            session: wire.session,
            finished_at: wire.finished_at,
            events: EventQueue::new(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
