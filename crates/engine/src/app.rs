//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    event_bus::InProcessEventBus,
    locks::AggregateLocks,
    memory::{InMemoryBetRepo, InMemoryFieldRepo, InMemoryMatchRepo},
    ports::{BetRepo, ClockPort, EventPublisher, FieldRepo, MatchRepo, RandomPort},
    settings::EngineSettings,
};
use crate::use_cases::{
    self,
    bet::{PlaceBet, ResolveBets},
    field::{CreateField, HitCell, RelocateMarkedCell},
    matches::{CreateMatch, FinishMatch, IncreaseScore, JoinMatch},
    EventReactor, RelocationTicker,
};

/// Main application state.
///
/// Holds the repositories, the wired use cases and the event bus they
/// publish to.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: use_cases::UseCases,
    pub event_bus: Arc<InProcessEventBus>,
    pub settings: EngineSettings,
    clock: Arc<dyn ClockPort>,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub matches: Arc<dyn MatchRepo>,
    pub fields: Arc<dyn FieldRepo>,
    pub bets: Arc<dyn BetRepo>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            matches: Arc::new(InMemoryMatchRepo::new()),
            fields: Arc::new(InMemoryFieldRepo::new()),
            bets: Arc::new(InMemoryBetRepo::new()),
        }
    }
}

impl App {
    /// Create a new App with all dependencies wired.
    pub fn new(
        repositories: Repositories,
        event_bus: Arc<InProcessEventBus>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        settings: EngineSettings,
    ) -> Self {
        let events: Arc<dyn EventPublisher> = event_bus.clone();
        let locks = Arc::new(AggregateLocks::new());

        let matches = use_cases::MatchUseCases::new(
            Arc::new(CreateMatch::new(
                repositories.matches.clone(),
                random.clone(),
                settings.max_players,
            )),
            Arc::new(JoinMatch::new(
                repositories.matches.clone(),
                events.clone(),
                clock.clone(),
                locks.clone(),
            )),
            Arc::new(IncreaseScore::new(
                repositories.matches.clone(),
                clock.clone(),
                locks.clone(),
            )),
            Arc::new(FinishMatch::new(
                repositories.matches.clone(),
                events.clone(),
                clock.clone(),
                locks.clone(),
            )),
        );

        let field = use_cases::FieldUseCases::new(
            Arc::new(CreateField::new(
                repositories.fields.clone(),
                random.clone(),
                locks.clone(),
                settings.field_size,
            )),
            Arc::new(HitCell::new(
                repositories.fields.clone(),
                repositories.matches.clone(),
                events.clone(),
                clock.clone(),
                random.clone(),
                locks.clone(),
            )),
            Arc::new(RelocateMarkedCell::new(
                repositories.fields.clone(),
                events.clone(),
                clock.clone(),
                random.clone(),
                locks.clone(),
            )),
        );

        let bet = use_cases::BetUseCases::new(
            Arc::new(PlaceBet::new(
                repositories.bets.clone(),
                repositories.matches.clone(),
                random,
                locks.clone(),
            )),
            Arc::new(ResolveBets::new(repositories.bets.clone(), events, locks)),
        );

        Self {
            repositories,
            use_cases: use_cases::UseCases {
                matches,
                field,
                bet,
            },
            event_bus,
            settings,
            clock,
        }
    }

    /// In-memory storage with the system clock and random source.
    pub fn in_memory(settings: EngineSettings) -> Self {
        Self::new(
            Repositories::in_memory(),
            Arc::new(InProcessEventBus::new(settings.event_channel_capacity)),
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            settings,
        )
    }

    /// Reactor wired to this app's use cases. Feed it with `event_bus.subscribe()`.
    pub fn reactor(&self) -> Arc<EventReactor> {
        Arc::new(EventReactor::new(
            self.use_cases.field.create.clone(),
            self.use_cases.bet.resolve.clone(),
        ))
    }

    pub fn relocation_ticker(&self) -> Arc<RelocationTicker> {
        Arc::new(RelocationTicker::new(
            self.repositories.fields.clone(),
            self.use_cases.field.relocate.clone(),
            self.use_cases.matches.finish.clone(),
            self.clock.clone(),
            self.settings.relocation_interval,
        ))
    }
}
