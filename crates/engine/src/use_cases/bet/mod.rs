//! Bet use cases.

use std::sync::Arc;

use whackbet_domain::{Bet, BetId, DomainError, MatchId, PlayerId};

use super::{publish, BET_LOCK, MATCH_LOCK};
use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{BetRepo, EventPublisher, MatchRepo, RandomPort, RepoError};

/// Container for bet use cases.
pub struct BetUseCases {
    pub place: Arc<PlaceBet>,
    pub resolve: Arc<ResolveBets>,
}

impl BetUseCases {
    pub fn new(place: Arc<PlaceBet>, resolve: Arc<ResolveBets>) -> Self {
        Self { place, resolve }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BetError {
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

// =============================================================================
// Place
// =============================================================================

/// Open a wager between players of a match that has not finished.
///
/// The match lock is held until the bet is stored, so a bet is either saved
/// before the match finishes (and gets settled with it) or rejected.
pub struct PlaceBet {
    bets: Arc<dyn BetRepo>,
    matches: Arc<dyn MatchRepo>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
}

impl PlaceBet {
    pub fn new(
        bets: Arc<dyn BetRepo>,
        matches: Arc<dyn MatchRepo>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            bets,
            matches,
            random,
            locks,
        }
    }

    pub async fn execute(
        &self,
        game_id: MatchId,
        amount: f64,
        player_ids: Vec<PlayerId>,
    ) -> Result<Bet, BetError> {
        let _guard = self.locks.acquire(MATCH_LOCK, game_id.as_str()).await;
        let game = self
            .matches
            .get(game_id.clone())
            .await?
            .ok_or_else(|| BetError::MatchNotFound(game_id.clone()))?;

        if game.is_finished() {
            return Err(DomainError::MatchAlreadyFinished(game_id).into());
        }
        if let Some(stranger) = player_ids.iter().find(|id| game.player(id).is_none()) {
            return Err(DomainError::player_not_found(&game_id, stranger).into());
        }

        let bet_id = BetId::from(self.random.gen_uuid().to_string());
        let bet = Bet::create(bet_id, game_id, amount, player_ids)?;
        self.bets.save(&bet).await?;

        tracing::info!(
            bet_id = %bet.id(),
            game_id = %bet.game_id(),
            amount = bet.amount(),
            players = bet.player_ids().len(),
            "Bet placed"
        );
        Ok(bet)
    }
}

// =============================================================================
// Resolve
// =============================================================================

/// Settle every active bet of a match in favour of its winner.
pub struct ResolveBets {
    bets: Arc<dyn BetRepo>,
    events: Arc<dyn EventPublisher>,
    locks: Arc<AggregateLocks>,
}

impl ResolveBets {
    pub fn new(
        bets: Arc<dyn BetRepo>,
        events: Arc<dyn EventPublisher>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            bets,
            events,
            locks,
        }
    }

    /// Returns the ids of the bets settled by this call.
    ///
    /// Bets the winner did not take part in stay active and are skipped.
    pub async fn execute(
        &self,
        game_id: MatchId,
        winner: &PlayerId,
    ) -> Result<Vec<BetId>, BetError> {
        let mut resolved = Vec::new();

        for listed in self.bets.list_for_game(game_id.clone()).await? {
            if listed.is_finished() {
                continue;
            }

            let bet_id = listed.id().clone();
            let _guard = self.locks.acquire(BET_LOCK, bet_id.as_str()).await;
            let Some(mut bet) = self.bets.get(bet_id.clone()).await? else {
                continue;
            };
            if bet.is_finished() {
                continue;
            }

            match bet.finish_bet(winner) {
                Ok(()) => {}
                Err(DomainError::UnknownWinner { .. }) => {
                    tracing::warn!(
                        bet_id = %bet_id,
                        game_id = %game_id,
                        winner = %winner,
                        "Winner is not part of bet, leaving it active"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let events = bet.take_events();
            self.bets.save(&bet).await?;
            publish(self.events.as_ref(), events);

            tracing::info!(
                bet_id = %bet_id,
                game_id = %game_id,
                winner = %winner,
                amount = bet.amount(),
                "Bet settled"
            );
            resolved.push(bet_id);
        }

        self.locks.prune();
        Ok(resolved)
    }
}
