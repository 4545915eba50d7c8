//! Repository port traits for aggregate storage.
//!
//! Repositories load and save whole aggregates by id. They never see pending
//! events: use cases drain them before saving.

use async_trait::async_trait;
use whackbet_domain::{Bet, BetId, Field, FieldId, Match, MatchId};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepo: Send + Sync {
    async fn get(&self, id: MatchId) -> Result<Option<Match>, RepoError>;
    async fn save(&self, game: &Match) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldRepo: Send + Sync {
    async fn get(&self, id: FieldId) -> Result<Option<Field>, RepoError>;
    async fn save(&self, field: &Field) -> Result<(), RepoError>;

    // Queries
    async fn get_for_game(&self, game_id: MatchId) -> Result<Option<Field>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Field>, RepoError>;
    /// Fields whose game has not been closed yet.
    async fn list_open(&self) -> Result<Vec<Field>, RepoError>;

    /// Drop a game's field from `list_open`. The field itself stays readable.
    async fn close_for_game(&self, game_id: MatchId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BetRepo: Send + Sync {
    async fn get(&self, id: BetId) -> Result<Option<Bet>, RepoError>;
    async fn save(&self, bet: &Bet) -> Result<(), RepoError>;

    // Queries
    async fn list_for_game(&self, game_id: MatchId) -> Result<Vec<Bet>, RepoError>;
}
