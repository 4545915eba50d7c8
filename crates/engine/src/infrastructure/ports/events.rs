//! Outbound port for drained domain events.

use whackbet_domain::DomainEvent;

/// Accepts the events of one successful command, in emission order.
#[cfg_attr(test, mockall::automock)]
pub trait EventPublisher: Send + Sync {
    fn publish(&self, events: Vec<DomainEvent>);
}
