//! Bet aggregate - a wager on the outcome of a match
//!
//! A bet is placed by the players of a match and stays `ACTIVE` until the
//! engine resolves it with the match winner.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::error::DomainError;
use crate::events::{BetFinishedEvent, EventQueue};
use crate::ids::{BetId, MatchId, PlayerId};
use crate::value_objects::{BetStatus, Stake};

/// A wager
///
/// # Invariants
///
/// - `amount` is finite and positive
/// - `player_ids` holds no duplicates
/// - `winner_player_id` is set iff `status` is `FINISHED`, and only once
#[derive(Debug, Clone)]
pub struct Bet {
    id: BetId,
    game_id: MatchId,
    amount: Stake,
    player_ids: Vec<PlayerId>,
    winner_player_id: Option<PlayerId>,
    status: BetStatus,
    events: EventQueue<BetFinishedEvent>,
}

impl Bet {
    /// Place an active bet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is not positive or a
    /// player id is listed twice.
    pub fn create(
        id: BetId,
        game_id: MatchId,
        amount: f64,
        player_ids: Vec<PlayerId>,
    ) -> Result<Self, DomainError> {
        let amount = Stake::new(amount)?;

        if let Some(duplicate) = first_duplicate(&player_ids) {
            return Err(DomainError::validation(format!(
                "Player {} is listed twice on bet {}",
                duplicate, id
            )));
        }

        Ok(Self {
            id,
            game_id,
            amount,
            player_ids,
            winner_player_id: None,
            status: BetStatus::Active,
            events: EventQueue::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> &BetId {
        &self.id
    }

    #[inline]
    pub fn game_id(&self) -> &MatchId {
        &self.game_id
    }

    #[inline]
    pub fn amount(&self) -> f64 {
        self.amount.value()
    }

    #[inline]
    pub fn player_ids(&self) -> &[PlayerId] {
        &self.player_ids
    }

    #[inline]
    pub fn winner_player_id(&self) -> Option<&PlayerId> {
        self.winner_player_id.as_ref()
    }

    #[inline]
    pub fn status(&self) -> BetStatus {
        self.status
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    #[inline]
    pub fn events(&self) -> &[BetFinishedEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<BetFinishedEvent> {
        self.events.drain()
    }

    /// Resolve the bet in favour of `player_id`.
    ///
    /// # Errors
    ///
    /// - `BetAlreadyFinished` if a winner is already recorded
    /// - `UnknownWinner` if the player did not take part in the bet
    pub fn finish_bet(&mut self, player_id: &PlayerId) -> Result<(), DomainError> {
        if self.is_finished() {
            return Err(DomainError::BetAlreadyFinished(self.id.clone()));
        }

        if !self.player_ids.contains(player_id) {
            return Err(DomainError::UnknownWinner {
                bet_id: self.id.clone(),
                player_id: player_id.clone(),
            });
        }

        self.winner_player_id = Some(player_id.clone());
        self.status = BetStatus::Finished;
        self.events.push(BetFinishedEvent {
            bet_id: self.id.clone(),
            game_id: self.game_id.clone(),
            winner_player_id: player_id.clone(),
            amount: self.amount.value(),
        });

        Ok(())
    }
}

fn first_duplicate(ids: &[PlayerId]) -> Option<&PlayerId> {
    let mut seen = HashSet::new();
    ids.iter().find(|id| !seen.insert(*id))
}

// ============================================================================
// Serde Implementation
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BetWireFormat {
    id: BetId,
    game_id: MatchId,
    amount: Stake,
    player_ids: Vec<PlayerId>,
    winner_player_id: Option<PlayerId>,
    status: BetStatus,
}

impl Serialize for Bet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = BetWireFormat {
            id: self.id.clone(),
            game_id: self.game_id.clone(),
            amount: self.amount,
            player_ids: self.player_ids.clone(),
            winner_player_id: self.winner_player_id.clone(),
            status: self.status,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = BetWireFormat::deserialize(deserializer)?;

        if wire.winner_player_id.is_some() != wire.status.is_terminal() {
            return Err(DeError::custom("winner must be set iff the bet is finished"));
        }

        if let Some(winner) = &wire.winner_player_id {
            if !wire.player_ids.contains(winner) {
                return Err(DeError::custom(format!(
                    "winner {winner} is not a participant of the bet"
                )));
            }
        }

        let mut bet = Bet::create(wire.id, wire.game_id, wire.amount.value(), wire.player_ids)
            .map_err(DeError::custom)?;
        bet.winner_player_id = wire.winner_player_id;
        bet.status = wire.status;
        Ok(bet)
    }
}
