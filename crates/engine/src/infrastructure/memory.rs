//! In-memory repositories.
//!
//! Aggregates are kept in their serialized JSON shape, so every load goes
//! through the same validating deserializers a database adapter would use.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use whackbet_domain::{Bet, BetId, Field, FieldId, Match, MatchId};

use crate::infrastructure::ports::{BetRepo, FieldRepo, MatchRepo, RepoError};

fn encode<T: serde::Serialize>(aggregate: &T) -> Result<Value, RepoError> {
    serde_json::to_value(aggregate).map_err(RepoError::serialization)
}

fn decode<T: serde::de::DeserializeOwned>(stored: &Value) -> Result<T, RepoError> {
    serde_json::from_value(stored.clone()).map_err(RepoError::serialization)
}

// =============================================================================
// Matches
// =============================================================================

#[derive(Default)]
pub struct InMemoryMatchRepo {
    matches: DashMap<MatchId, Value>,
}

impl InMemoryMatchRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepo for InMemoryMatchRepo {
    async fn get(&self, id: MatchId) -> Result<Option<Match>, RepoError> {
        self.matches
            .get(&id)
            .map(|stored| decode(stored.value()))
            .transpose()
    }

    async fn save(&self, game: &Match) -> Result<(), RepoError> {
        let stored = encode(game)?;
        self.matches.insert(game.id().clone(), stored);
        Ok(())
    }
}

// =============================================================================
// Fields
// =============================================================================

#[derive(Default)]
pub struct InMemoryFieldRepo {
    fields: DashMap<FieldId, Value>,
    by_game: DashMap<MatchId, FieldId>,
    open: DashSet<FieldId>,
}

impl InMemoryFieldRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FieldRepo for InMemoryFieldRepo {
    async fn get(&self, id: FieldId) -> Result<Option<Field>, RepoError> {
        self.fields
            .get(&id)
            .map(|stored| decode(stored.value()))
            .transpose()
    }

    async fn save(&self, field: &Field) -> Result<(), RepoError> {
        let stored = encode(field)?;
        // Only a new field is open; saving a closed one keeps it closed
        if self.fields.insert(field.id().clone(), stored).is_none() {
            self.open.insert(field.id().clone());
        }
        self.by_game
            .insert(field.game_id().clone(), field.id().clone());
        Ok(())
    }

    async fn get_for_game(&self, game_id: MatchId) -> Result<Option<Field>, RepoError> {
        let Some(field_id) = self.by_game.get(&game_id).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        self.get(field_id).await
    }

    async fn list_all(&self) -> Result<Vec<Field>, RepoError> {
        self.fields
            .iter()
            .map(|stored| decode(stored.value()))
            .collect()
    }

    async fn list_open(&self) -> Result<Vec<Field>, RepoError> {
        let open: Vec<FieldId> = self.open.iter().map(|id| id.key().clone()).collect();
        let mut fields = Vec::with_capacity(open.len());
        for field_id in open {
            if let Some(field) = self.get(field_id).await? {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    async fn close_for_game(&self, game_id: MatchId) -> Result<(), RepoError> {
        if let Some(field_id) = self.by_game.get(&game_id).map(|id| id.value().clone()) {
            self.open.remove(&field_id);
        }
        Ok(())
    }
}

// =============================================================================
// Bets
// =============================================================================

#[derive(Default)]
pub struct InMemoryBetRepo {
    bets: DashMap<BetId, Value>,
}

impl InMemoryBetRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BetRepo for InMemoryBetRepo {
    async fn get(&self, id: BetId) -> Result<Option<Bet>, RepoError> {
        self.bets
            .get(&id)
            .map(|stored| decode(stored.value()))
            .transpose()
    }

    async fn save(&self, bet: &Bet) -> Result<(), RepoError> {
        let stored = encode(bet)?;
        self.bets.insert(bet.id().clone(), stored);
        Ok(())
    }

    async fn list_for_game(&self, game_id: MatchId) -> Result<Vec<Bet>, RepoError> {
        let mut bets = Vec::new();
        for stored in self.bets.iter() {
            let bet: Bet = decode(stored.value())?;
            if bet.game_id() == &game_id {
                bets.push(bet);
            }
        }
        bets.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(bets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use whackbet_domain::{Player, PlayerId, PlayerName, Session};

    fn player(id: &str) -> Player {
        Player::create(PlayerId::from(id), PlayerName::new(id).unwrap())
    }

    #[tokio::test]
    async fn match_round_trips_without_pending_events() {
        let repo = InMemoryMatchRepo::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut game = Match::create(MatchId::from("game-1"), player("p1"), 2).unwrap();
        game.join(player("p2"), now).unwrap();
        assert_eq!(game.events().len(), 1);

        repo.save(&game).await.unwrap();
        let loaded = repo.get(MatchId::from("game-1")).await.unwrap().unwrap();

        assert_eq!(loaded.players().len(), 2);
        assert_eq!(loaded.session(), game.session());
        assert!(loaded.events().is_empty());
    }

    #[tokio::test]
    async fn missing_match_is_none() {
        let repo = InMemoryMatchRepo::new();
        assert!(repo.get(MatchId::from("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn field_is_found_by_game() {
        let repo = InMemoryFieldRepo::new();
        let session = Session::create(1, Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
        let mut rng = |_min: u32, _max: u32| 3;
        let field = Field::create(
            FieldId::from("field-1"),
            vec![PlayerId::from("p1")],
            MatchId::from("game-1"),
            9,
            session,
            &mut rng,
        )
        .unwrap();

        repo.save(&field).await.unwrap();

        let found = repo
            .get_for_game(MatchId::from("game-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id().as_str(), "field-1");
        assert_eq!(found.marked_cell_position(), 3);
        assert!(repo
            .get_for_game(MatchId::from("game-2"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_field_leaves_the_open_list() {
        let repo = InMemoryFieldRepo::new();
        let session = Session::create(1, Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
        let mut rng = |_min: u32, _max: u32| 3;
        for game in ["game-1", "game-2"] {
            let field = Field::create(
                FieldId::from(format!("field-{game}")),
                vec![PlayerId::from("p1")],
                MatchId::from(game),
                9,
                session,
                &mut rng,
            )
            .unwrap();
            repo.save(&field).await.unwrap();
        }

        repo.close_for_game(MatchId::from("game-1")).await.unwrap();
        // A later save must not reopen it
        let closed = repo.get_for_game(MatchId::from("game-1")).await.unwrap().unwrap();
        repo.save(&closed).await.unwrap();

        let open = repo.list_open().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].game_id().as_str(), "game-2");
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        assert!(repo.get_for_game(MatchId::from("game-1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn bets_are_listed_per_game() {
        let repo = InMemoryBetRepo::new();
        let players = vec![PlayerId::from("p1"), PlayerId::from("p2")];
        for (bet, game) in [("bet-2", "game-1"), ("bet-1", "game-1"), ("bet-3", "game-2")] {
            let bet = Bet::create(BetId::from(bet), MatchId::from(game), 5.0, players.clone())
                .unwrap();
            repo.save(&bet).await.unwrap();
        }

        let bets = repo.list_for_game(MatchId::from("game-1")).await.unwrap();

        let ids: Vec<&str> = bets.iter().map(|bet| bet.id().as_str()).collect();
        assert_eq!(ids, vec!["bet-1", "bet-2"]);
    }
}
