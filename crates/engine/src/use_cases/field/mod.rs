//! Field use cases.
//!
//! One field exists per started match. Fields are located and locked by the
//! id of their game. A hit also takes the match lock, field first, so the
//! point is on the match before it can be finished.

mod relocation;

pub use relocation::{RelocationTicker, TickReport};

use std::sync::Arc;

use whackbet_domain::{
    DomainError, Field, FieldId, HitOutcome, MatchId, PlayerId, Session,
};

use super::{publish, FIELD_LOCK, MATCH_LOCK};
use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{
    ClockPort, EventPublisher, FieldRepo, MatchRepo, RandomPort, RepoError,
};

/// Container for field use cases.
pub struct FieldUseCases {
    pub create: Arc<CreateField>,
    pub hit: Arc<HitCell>,
    pub relocate: Arc<RelocateMarkedCell>,
}

impl FieldUseCases {
    pub fn new(
        create: Arc<CreateField>,
        hit: Arc<HitCell>,
        relocate: Arc<RelocateMarkedCell>,
    ) -> Self {
        Self {
            create,
            hit,
            relocate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("No field for game {0}")]
    NoFieldForGame(MatchId),
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Adapt the random port to the domain's draw signature.
fn draws(random: &dyn RandomPort) -> impl FnMut(u32, u32) -> u32 + '_ {
    move |min, max| random.gen_range(min, max)
}

// =============================================================================
// Create
// =============================================================================

/// Lay out the board for a started match. Idempotent per game.
pub struct CreateField {
    fields: Arc<dyn FieldRepo>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
    size: u32,
}

impl CreateField {
    pub fn new(
        fields: Arc<dyn FieldRepo>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
        size: u32,
    ) -> Self {
        Self {
            fields,
            random,
            locks,
            size,
        }
    }

    pub async fn execute(
        &self,
        game_id: MatchId,
        player_ids: Vec<PlayerId>,
        session: Session,
    ) -> Result<Field, FieldError> {
        let _guard = self.locks.acquire(FIELD_LOCK, game_id.as_str()).await;

        if let Some(existing) = self.fields.get_for_game(game_id.clone()).await? {
            tracing::debug!(game_id = %game_id, field_id = %existing.id(), "Field already exists");
            return Ok(existing);
        }

        let field_id = FieldId::from(self.random.gen_uuid().to_string());
        let field = Field::create(
            field_id,
            player_ids,
            game_id,
            self.size,
            session,
            &mut draws(self.random.as_ref()),
        )?;
        self.fields.save(&field).await?;

        tracing::info!(
            game_id = %field.game_id(),
            field_id = %field.id(),
            size = field.size(),
            marked_cell_position = field.marked_cell_position(),
            "Field created"
        );
        Ok(field)
    }
}

// =============================================================================
// Hit
// =============================================================================

/// A player's attempt to hit a cell. A hit scores the player's point on the
/// match in the same step, at the instant the hit landed.
pub struct HitCell {
    fields: Arc<dyn FieldRepo>,
    matches: Arc<dyn MatchRepo>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
}

impl HitCell {
    pub fn new(
        fields: Arc<dyn FieldRepo>,
        matches: Arc<dyn MatchRepo>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            fields,
            matches,
            events,
            clock,
            random,
            locks,
        }
    }

    pub async fn execute(
        &self,
        game_id: MatchId,
        player_id: PlayerId,
        cell_position: u32,
    ) -> Result<HitOutcome, FieldError> {
        let _field_guard = self.locks.acquire(FIELD_LOCK, game_id.as_str()).await;
        let _match_guard = self.locks.acquire(MATCH_LOCK, game_id.as_str()).await;
        let now = self.clock.now();

        let mut field = self
            .fields
            .get_for_game(game_id.clone())
            .await?
            .ok_or_else(|| FieldError::NoFieldForGame(game_id.clone()))?;

        let outcome = field.hit(
            cell_position,
            &player_id,
            now,
            &mut draws(self.random.as_ref()),
        )?;

        match outcome {
            HitOutcome::Miss => {
                tracing::debug!(game_id = %game_id, player_id = %player_id, cell_position, "Missed");
            }
            HitOutcome::Hit { new_position } => {
                let mut game = self
                    .matches
                    .get(game_id.clone())
                    .await?
                    .ok_or_else(|| FieldError::MatchNotFound(game_id.clone()))?;
                let change = game.increase_player_score(&player_id, now)?;

                let events = field.take_events();
                self.matches.save(&game).await?;
                self.fields.save(&field).await?;
                publish(self.events.as_ref(), events);
                tracing::info!(
                    game_id = %game_id,
                    player_id = %player_id,
                    cell_position,
                    new_position,
                    score = change.score,
                    "Marked cell hit"
                );
            }
        }

        Ok(outcome)
    }
}

// =============================================================================
// Relocate
// =============================================================================

/// Move the mark of a game's field to a different cell.
pub struct RelocateMarkedCell {
    fields: Arc<dyn FieldRepo>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
}

impl RelocateMarkedCell {
    pub fn new(
        fields: Arc<dyn FieldRepo>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            fields,
            events,
            clock,
            random,
            locks,
        }
    }

    pub async fn execute(&self, game_id: MatchId) -> Result<u32, FieldError> {
        let _guard = self.locks.acquire(FIELD_LOCK, game_id.as_str()).await;
        let mut field = self
            .fields
            .get_for_game(game_id.clone())
            .await?
            .ok_or_else(|| FieldError::NoFieldForGame(game_id.clone()))?;

        let new_position =
            field.change_marked_cell_position(self.clock.now(), &mut draws(self.random.as_ref()))?;
        let events = field.take_events();
        self.fields.save(&field).await?;
        publish(self.events.as_ref(), events);

        tracing::debug!(game_id = %game_id, new_position, "Marked cell relocated");
        Ok(new_position)
    }
}
