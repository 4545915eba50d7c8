//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through command methods taking an explicit `now`
//! - Queues domain events on success and leaves them for the caller to drain
//!
//! Aggregates refer to each other by id only. A `Field` or `Bet` knows the
//! `MatchId` it belongs to; a `Match` knows nothing about either.

pub mod bet;
pub mod field;
pub mod game_match;

pub use bet::Bet;
pub use field::Field;
pub use game_match::{Match, MatchState, MIN_PLAYERS};
