//! In-process event delivery over a tokio broadcast channel.

use tokio::sync::broadcast;
use whackbet_domain::DomainEvent;

use crate::infrastructure::ports::EventPublisher;

/// Fans published events out to every live subscriber.
///
/// Events published while nobody listens are dropped. A subscriber that falls
/// more than `capacity` events behind observes `RecvError::Lagged`.
pub struct InProcessEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl InProcessEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, events: Vec<DomainEvent>) {
        for event in events {
            let event_type = event.event_type();
            let game_id = event.game_id().clone();
            match self.sender.send(event) {
                Ok(receivers) => tracing::trace!(
                    event_type,
                    game_id = %game_id,
                    receivers,
                    "Published domain event"
                ),
                Err(_) => tracing::debug!(
                    event_type,
                    game_id = %game_id,
                    "Dropped domain event, no subscribers"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whackbet_domain::{MarkedCellHitEvent, MatchId, PlayerId};

    fn hit(cell_position: u32) -> DomainEvent {
        DomainEvent::MarkedCellHit(MarkedCellHitEvent {
            player_id: PlayerId::from("p1"),
            game_id: MatchId::from("game-1"),
            cell_position,
        })
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = InProcessEventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(vec![hit(1), hit(2)]);

        for receiver in [&mut first, &mut second] {
            assert_eq!(receiver.recv().await.unwrap(), hit(1));
            assert_eq!(receiver.recv().await.unwrap(), hit(2));
        }
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = InProcessEventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(vec![hit(4)]);
    }
}
