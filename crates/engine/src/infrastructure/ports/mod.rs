//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Aggregate storage (in-memory today, a database later)
//! - Event delivery (in-process broadcast today)
//! - Clock/Random (for testing)

mod error;
mod events;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{BetRepo, FieldRepo, MatchRepo};

// =============================================================================
// Event Delivery Port
// =============================================================================
pub use events::EventPublisher;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockBetRepo, MockFieldRepo, MockMatchRepo};

#[cfg(test)]
pub use events::MockEventPublisher;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
