//! Domain entities - Core business objects with identity, owned by an aggregate

mod player;

pub use player::Player;
