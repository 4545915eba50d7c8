//! Value objects - Immutable objects defined by their attributes

mod bet_status;
mod names;
mod session;
mod stake;

pub use bet_status::BetStatus;
pub use names::PlayerName;
pub use session::{Session, MINUTES_TO_PLAY};
pub use stake::Stake;
