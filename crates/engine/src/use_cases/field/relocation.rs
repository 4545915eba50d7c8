//! Periodic marked cell relocation.
//!
//! Every interval the ticker moves the mark on each open field whose session
//! is still running. Fields whose session has ended get their match closed
//! instead, which in turn settles the bets on it. A closed game's field is
//! dropped from the open list and never visited again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use whackbet_domain::DomainError;

use super::{FieldError, RelocateMarkedCell};
use crate::infrastructure::ports::{ClockPort, FieldRepo};
use crate::use_cases::matches::{FinishMatch, MatchError};

/// What one tick did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub relocated: usize,
    pub finished: usize,
}

pub struct RelocationTicker {
    fields: Arc<dyn FieldRepo>,
    relocate: Arc<RelocateMarkedCell>,
    finish_match: Arc<FinishMatch>,
    clock: Arc<dyn ClockPort>,
    interval: Duration,
}

impl RelocationTicker {
    pub fn new(
        fields: Arc<dyn FieldRepo>,
        relocate: Arc<RelocateMarkedCell>,
        finish_match: Arc<FinishMatch>,
        clock: Arc<dyn ClockPort>,
        interval: Duration,
    ) -> Self {
        Self {
            fields,
            relocate,
            finish_match,
            clock,
            interval,
        }
    }

    /// Run one pass over every open field.
    ///
    /// Per-field failures are logged and skipped; only failing to list the
    /// fields aborts the pass.
    pub async fn tick(&self) -> Result<TickReport, FieldError> {
        let now = self.clock.now();
        let mut report = TickReport::default();

        for field in self.fields.list_open().await? {
            let game_id = field.game_id().clone();

            if field.session().is_over(now) {
                match self.finish_match.execute(game_id.clone()).await {
                    Ok(()) => report.finished += 1,
                    Err(MatchError::Domain(DomainError::MatchAlreadyFinished(_))) => {}
                    Err(e) => {
                        // Stays open, retried next tick
                        tracing::warn!(game_id = %game_id, error = %e, "Failed to finish match");
                        continue;
                    }
                }
                if let Err(e) = self.fields.close_for_game(game_id.clone()).await {
                    tracing::warn!(game_id = %game_id, error = %e, "Failed to close field");
                }
                continue;
            }

            match self.relocate.execute(game_id.clone()).await {
                Ok(_) => report.relocated += 1,
                // Session ran out between listing and relocating
                Err(FieldError::Domain(DomainError::SessionOver(_))) => {
                    tracing::debug!(game_id = %game_id, "Skipped relocation, session over");
                }
                Err(e) => {
                    tracing::warn!(game_id = %game_id, error = %e, "Failed to relocate marked cell")
                }
            }
        }

        Ok(report)
    }

    /// Tick until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Relocation ticker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(report) => tracing::debug!(
                            relocated = report.relocated,
                            finished = report.finished,
                            "Relocation tick"
                        ),
                        Err(e) => tracing::warn!(error = %e, "Relocation tick failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Relocation ticker stopped");
    }
}
