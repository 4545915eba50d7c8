//! Cross-aggregate reactions to published domain events.
//!
//! - `MatchStarted` lays out the field for the match
//! - `MatchFinished` settles the match's bets in favour of the leader
//!
//! `MarkedCellHit` needs no reaction: the hit scored its point on the match
//! before the event was published.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use whackbet_domain::DomainEvent;

use super::bet::{BetError, ResolveBets};
use super::field::{CreateField, FieldError};

#[derive(Debug, thiserror::Error)]
pub enum ReactionError {
    #[error("Field reaction failed: {0}")]
    Field(#[from] FieldError),
    #[error("Bet reaction failed: {0}")]
    Bet(#[from] BetError),
}

pub struct EventReactor {
    create_field: Arc<CreateField>,
    resolve_bets: Arc<ResolveBets>,
}

impl EventReactor {
    pub fn new(create_field: Arc<CreateField>, resolve_bets: Arc<ResolveBets>) -> Self {
        Self {
            create_field,
            resolve_bets,
        }
    }

    /// React to a single event. Events without a reaction are ignored.
    pub async fn handle(&self, event: &DomainEvent) -> Result<(), ReactionError> {
        match event {
            DomainEvent::MatchStarted(started) => {
                self.create_field
                    .execute(
                        started.match_id.clone(),
                        started.player_ids.clone(),
                        started.session(),
                    )
                    .await?;
            }
            DomainEvent::MatchFinished(finished) => match finished.leader() {
                Some(leader) => {
                    self.resolve_bets
                        .execute(finished.match_id.clone(), &leader.id)
                        .await?;
                }
                None => {
                    tracing::warn!(match_id = %finished.match_id, "Finished match has no players");
                }
            },
            DomainEvent::MarkedCellHit(_)
            | DomainEvent::FieldMarkedCellPositionChanged(_)
            | DomainEvent::BetFinished(_) => {}
        }
        Ok(())
    }

    /// Consume `receiver` until the bus closes.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<DomainEvent>) {
        tracing::info!("Event reactor started");

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handle(&event).await {
                        tracing::warn!(
                            event_type = event.event_type(),
                            game_id = %event.game_id(),
                            error = %e,
                            "Event reaction failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event reactor lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }

        tracing::info!("Event reactor stopped");
    }
}
