//! Match use cases.
//!
//! Handles the match lifecycle:
//! - Opening a lobby with its first player
//! - Joining players until the roster is full and the session starts
//! - Awarding points while the session runs
//! - Closing the match once the session is over

use std::sync::Arc;

use whackbet_domain::{
    DomainError, JoinOutcome, Match, MatchId, Player, PlayerId, PlayerName, ScoreChange,
};

use super::{publish, MATCH_LOCK};
use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{ClockPort, EventPublisher, MatchRepo, RandomPort, RepoError};

/// Container for match use cases.
pub struct MatchUseCases {
    pub create: Arc<CreateMatch>,
    pub join: Arc<JoinMatch>,
    pub increase_score: Arc<IncreaseScore>,
    pub finish: Arc<FinishMatch>,
}

impl MatchUseCases {
    pub fn new(
        create: Arc<CreateMatch>,
        join: Arc<JoinMatch>,
        increase_score: Arc<IncreaseScore>,
        finish: Arc<FinishMatch>,
    ) -> Self {
        Self {
            create,
            join,
            increase_score,
            finish,
        }
    }
}

/// Errors from match use cases.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Match not found: {0}")]
    NotFound(MatchId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

// =============================================================================
// Create
// =============================================================================

/// Open a lobby holding its first player.
pub struct CreateMatch {
    matches: Arc<dyn MatchRepo>,
    random: Arc<dyn RandomPort>,
    max_players: u32,
}

impl CreateMatch {
    pub fn new(matches: Arc<dyn MatchRepo>, random: Arc<dyn RandomPort>, max_players: u32) -> Self {
        Self {
            matches,
            random,
            max_players,
        }
    }

    pub async fn execute(&self, player_id: PlayerId, player_name: &str) -> Result<Match, MatchError> {
        let player = Player::create(player_id, PlayerName::new(player_name)?);
        let match_id = MatchId::from(self.random.gen_uuid().to_string());
        let game = Match::create(match_id, player, self.max_players)?;

        self.matches.save(&game).await?;

        tracing::info!(
            match_id = %game.id(),
            max_players = self.max_players,
            "Match created"
        );
        Ok(game)
    }
}

// =============================================================================
// Join
// =============================================================================

/// Add a player to a lobby, starting the session when the roster fills.
pub struct JoinMatch {
    matches: Arc<dyn MatchRepo>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<AggregateLocks>,
}

impl JoinMatch {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            matches,
            events,
            clock,
            locks,
        }
    }

    pub async fn execute(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        player_name: &str,
    ) -> Result<JoinOutcome, MatchError> {
        let player = Player::create(player_id.clone(), PlayerName::new(player_name)?);

        let _guard = self.locks.acquire(MATCH_LOCK, match_id.as_str()).await;
        let mut game = self
            .matches
            .get(match_id.clone())
            .await?
            .ok_or_else(|| MatchError::NotFound(match_id.clone()))?;

        let outcome = game.join(player, self.clock.now())?;
        let events = game.take_events();
        self.matches.save(&game).await?;
        publish(self.events.as_ref(), events);

        match &outcome {
            JoinOutcome::Waiting {
                joined,
                max_players,
            } => tracing::info!(
                match_id = %match_id,
                player_id = %player_id,
                joined,
                max_players,
                "Player joined match"
            ),
            JoinOutcome::MatchStarted { session } => tracing::info!(
                match_id = %match_id,
                player_id = %player_id,
                ends_at = %session.ends_at(),
                "Match started"
            ),
        }

        Ok(outcome)
    }
}

// =============================================================================
// Score
// =============================================================================

/// Award one point to a player of a running match.
pub struct IncreaseScore {
    matches: Arc<dyn MatchRepo>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<AggregateLocks>,
}

impl IncreaseScore {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            matches,
            clock,
            locks,
        }
    }

    pub async fn execute(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<ScoreChange, MatchError> {
        let _guard = self.locks.acquire(MATCH_LOCK, match_id.as_str()).await;
        let mut game = self
            .matches
            .get(match_id.clone())
            .await?
            .ok_or_else(|| MatchError::NotFound(match_id.clone()))?;

        let change = game.increase_player_score(&player_id, self.clock.now())?;
        self.matches.save(&game).await?;

        tracing::debug!(
            match_id = %match_id,
            player_id = %change.player_id,
            score = change.score,
            "Score increased"
        );
        Ok(change)
    }
}

// =============================================================================
// Finish
// =============================================================================

/// Close a match whose session is over and publish the final scores.
pub struct FinishMatch {
    matches: Arc<dyn MatchRepo>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<AggregateLocks>,
}

impl FinishMatch {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            matches,
            events,
            clock,
            locks,
        }
    }

    pub async fn execute(&self, match_id: MatchId) -> Result<(), MatchError> {
        {
            let _guard = self.locks.acquire(MATCH_LOCK, match_id.as_str()).await;
            let mut game = self
                .matches
                .get(match_id.clone())
                .await?
                .ok_or_else(|| MatchError::NotFound(match_id.clone()))?;

            game.finish(self.clock.now())?;
            let events = game.take_events();
            self.matches.save(&game).await?;
            publish(self.events.as_ref(), events);

            tracing::info!(
                match_id = %match_id,
                leader = ?game.leader().map(|p| p.id().as_str()),
                "Match finished"
            );
        }

        self.locks.prune();
        Ok(())
    }
}
