//! Shared fixtures for end-to-end tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::broadcast;
use whackbet_domain::{DomainEvent, Field, Match, MatchId, PlayerId};

use crate::app::{App, Repositories};
use crate::infrastructure::clock::{CyclingRandom, FixedClock};
use crate::infrastructure::event_bus::InProcessEventBus;
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::EventReactor;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
}

pub struct E2EContext {
    pub app: App,
    pub clock: Arc<FixedClock>,
    reactor: Arc<EventReactor>,
    events: broadcast::Receiver<DomainEvent>,
}

impl E2EContext {
    pub fn new(settings: EngineSettings) -> Self {
        let clock = Arc::new(FixedClock::at(start_time()));
        let app = App::new(
            Repositories::in_memory(),
            Arc::new(InProcessEventBus::new(settings.event_channel_capacity)),
            clock.clone(),
            Arc::new(CyclingRandom::new()),
            settings,
        );
        let events = app.event_bus.subscribe();
        let reactor = app.reactor();

        Self {
            app,
            clock,
            reactor,
            events,
        }
    }

    /// Deliver every pending event to the reactor, including the ones its
    /// reactions publish, and return them in delivery order.
    pub async fn pump(&mut self) -> Vec<DomainEvent> {
        let mut delivered = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            self.reactor
                .handle(&event)
                .await
                .unwrap_or_else(|e| panic!("reaction to {} failed: {e}", event.event_type()));
            delivered.push(event);
        }
        delivered
    }

    /// Create a match for `players` (first one opens it) and start it.
    pub async fn started_match(&mut self, players: &[(&str, &str)]) -> MatchId {
        let (first_id, first_name) = players[0];
        let game = self
            .app
            .use_cases
            .matches
            .create
            .execute(PlayerId::from(first_id), first_name)
            .await
            .unwrap();
        for (id, name) in &players[1..] {
            self.app
                .use_cases
                .matches
                .join
                .execute(game.id().clone(), PlayerId::from(*id), name)
                .await
                .unwrap();
        }
        game.id().clone()
    }

    pub async fn game(&self, game_id: &MatchId) -> Match {
        self.app
            .repositories
            .matches
            .get(game_id.clone())
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn field(&self, game_id: &MatchId) -> Field {
        self.app
            .repositories
            .fields
            .get_for_game(game_id.clone())
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn event_types(events: &[DomainEvent]) -> Vec<&'static str> {
    events.iter().map(DomainEvent::event_type).collect()
}
