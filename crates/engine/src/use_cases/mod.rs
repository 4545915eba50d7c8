//! Use cases - command orchestration.
//!
//! Each module contains use cases for one aggregate. A command runs as
//! load → domain command → drain events → save → publish, under the
//! aggregate's lock.

pub mod bet;
pub mod field;
pub mod matches;
pub mod reactions;

// Re-export main types
pub use bet::{BetError, BetUseCases};
pub use field::{FieldError, FieldUseCases, RelocationTicker, TickReport};
pub use matches::{MatchError, MatchUseCases};
pub use reactions::{EventReactor, ReactionError};

use whackbet_domain::DomainEvent;

use crate::infrastructure::ports::EventPublisher;

/// Lock namespaces for `AggregateLocks`.
pub(crate) const MATCH_LOCK: &str = "match";
/// Fields are locked by the id of the game they belong to.
pub(crate) const FIELD_LOCK: &str = "field";
pub(crate) const BET_LOCK: &str = "bet";

/// Container for all use cases.
pub struct UseCases {
    pub matches: MatchUseCases,
    pub field: FieldUseCases,
    pub bet: BetUseCases,
}

/// Hand drained events to the publisher, preserving their order.
pub(crate) fn publish<E>(publisher: &dyn EventPublisher, events: Vec<E>)
where
    E: Into<DomainEvent>,
{
    if events.is_empty() {
        return;
    }
    publisher.publish(events.into_iter().map(Into::into).collect());
}
