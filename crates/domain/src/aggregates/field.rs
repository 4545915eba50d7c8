//! Field aggregate - the board players whack during a match
//!
//! One cell of the board is marked. Hitting it scores (the engine reacts to
//! `MarkedCellHitEvent`) and moves the mark; the engine also moves the mark
//! periodically. Every move lands on a different cell than the one before.
//!
//! The field belongs to a match by `game_id` only and keeps its own copy of
//! the match's `Session`.

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use crate::error::DomainError;
use crate::events::{
    EventQueue, FieldEvent, FieldMarkedCellPositionChanged, HitOutcome, MarkedCellHitEvent,
};
use crate::ids::{FieldId, MatchId, PlayerId};
use crate::random::{next_cell_position, RandomSource};
use crate::value_objects::Session;

/// A whack board
///
/// # Invariants
///
/// - `size > 1`
/// - `marked_cell_position < size`
/// - every reposition differs from the position it replaces
#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    player_ids: BTreeSet<PlayerId>,
    game_id: MatchId,
    session: Session,
    marked_cell_position: u32,
    size: u32,
    events: EventQueue<FieldEvent>,
}

impl Field {
    /// Create a board and place the first mark.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `size < 2` or no players are given.
    pub fn create(
        id: FieldId,
        player_ids: impl IntoIterator<Item = PlayerId>,
        game_id: MatchId,
        size: u32,
        session: Session,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, DomainError> {
        if size < 2 {
            return Err(DomainError::validation(format!(
                "Field size must be greater than 1, got {}",
                size
            )));
        }

        let player_ids: BTreeSet<PlayerId> = player_ids.into_iter().collect();
        if player_ids.is_empty() {
            return Err(DomainError::validation("Field needs at least one player"));
        }

        let marked_cell_position = next_cell_position(None, size, rng);

        Ok(Self {
            id,
            player_ids,
            game_id,
            session,
            marked_cell_position,
            size,
            events: EventQueue::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    #[inline]
    pub fn player_ids(&self) -> &BTreeSet<PlayerId> {
        &self.player_ids
    }

    #[inline]
    pub fn game_id(&self) -> &MatchId {
        &self.game_id
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn marked_cell_position(&self) -> u32 {
        self.marked_cell_position
    }

    #[inline]
    pub fn events(&self) -> &[FieldEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        self.events.drain()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Try to hit `cell_position`. A miss changes nothing and is not an error.
    ///
    /// # Errors
    ///
    /// - `PlayerNotFound` if the player is not on this field
    /// - `SessionOver` if the session has ended at `now`
    pub fn hit(
        &mut self,
        cell_position: u32,
        player_id: &PlayerId,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Result<HitOutcome, DomainError> {
        if !self.player_ids.contains(player_id) {
            return Err(DomainError::player_not_found(&self.game_id, player_id));
        }

        self.ensure_running(now)?;

        if cell_position != self.marked_cell_position {
            return Ok(HitOutcome::Miss);
        }

        let new_position = self.reposition(rng);
        self.events.push(FieldEvent::MarkedCellHit(MarkedCellHitEvent {
            player_id: player_id.clone(),
            game_id: self.game_id.clone(),
            cell_position,
        }));

        Ok(HitOutcome::Hit { new_position })
    }

    /// Move the mark to another cell, independent of any hit.
    ///
    /// # Errors
    ///
    /// - `SessionOver` if the session has ended at `now`
    pub fn change_marked_cell_position(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Result<u32, DomainError> {
        self.ensure_running(now)?;

        let new_position = self.reposition(rng);
        self.events
            .push(FieldEvent::MarkedCellPositionChanged(FieldMarkedCellPositionChanged {
                new_position,
                game_id: self.game_id.clone(),
                field_id: self.id.clone(),
            }));

        Ok(new_position)
    }

    fn ensure_running(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.session.is_over(now) {
            return Err(DomainError::SessionOver(self.game_id.clone()));
        }
        Ok(())
    }

    fn reposition(&mut self, rng: &mut dyn RandomSource) -> u32 {
        self.marked_cell_position =
            next_cell_position(Some(self.marked_cell_position), self.size, rng);
        self.marked_cell_position
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldWireFormat {
    id: FieldId,
    player_ids: BTreeSet<PlayerId>,
    game_id: MatchId,
    session: Session,
    marked_cell_position: u32,
    size: u32,
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = FieldWireFormat {
            id: self.id.clone(),
            player_ids: self.player_ids.clone(),
            game_id: self.game_id.clone(),
            session: self.session,
            marked_cell_position: self.marked_cell_position,
            size: self.size,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = FieldWireFormat::deserialize(deserializer)?;

        if wire.size < 2 {
            return Err(DeError::custom("field size must be greater than 1"));
        }
        if wire.marked_cell_position >= wire.size {
            return Err(DeError::custom("marked cell is outside the field"));
        }
        if wire.player_ids.is_empty() {
            return Err(DeError::custom("field without players"));
        }

        Ok(Field {
            id: wire.id,
            player_ids: wire.player_ids,
            game_id: wire.game_id,
            session: wire.session,
            marked_cell_position: wire.marked_cell_position,
            size: wire.size,
            events: EventQueue::new(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::VecDeque;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
    }

    /// Replays scripted draws, then cycles through the board.
    struct ScriptedRandom {
        draws: VecDeque<u32>,
        fallback: u32,
    }

    impl ScriptedRandom {
        fn new(draws: &[u32]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
                fallback: 0,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn gen_range(&mut self, min: u32, max: u32) -> u32 {
            self.draws.pop_front().unwrap_or_else(|| {
                self.fallback = if self.fallback >= max { min } else { self.fallback + 1 };
                self.fallback
            })
        }
    }

    fn field_with(draws: &[u32]) -> (Field, ScriptedRandom) {
        let mut rng = ScriptedRandom::new(draws);
        let field = Field::create(
            FieldId::from("field-1"),
            vec![PlayerId::from("1"), PlayerId::from("2")],
            MatchId::from("game-1"),
            9,
            Session::create(1, now()),
            &mut rng,
        )
        .unwrap();
        (field, rng)
    }

    mod constructor {
        use super::*;

        #[test]
        fn places_initial_mark_from_first_draw() {
            let (field, _) = field_with(&[4]);

            assert_eq!(field.marked_cell_position(), 4);
            assert_eq!(field.size(), 9);
            assert_eq!(field.game_id().as_str(), "game-1");
            assert_eq!(field.player_ids().len(), 2);
            assert!(field.events().is_empty());
        }

        #[test]
        fn rejects_single_cell_board() {
            let mut rng = ScriptedRandom::new(&[]);
            let result = Field::create(
                FieldId::new(),
                vec![PlayerId::from("1")],
                MatchId::new(),
                1,
                Session::create(1, now()),
                &mut rng,
            );

            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn rejects_empty_player_set() {
            let mut rng = ScriptedRandom::new(&[]);
            let result = Field::create(
                FieldId::new(),
                Vec::new(),
                MatchId::new(),
                9,
                Session::create(1, now()),
                &mut rng,
            );

            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn accepts_closure_random_source() {
            let mut rng = |_min: u32, max: u32| max;
            let field = Field::create(
                FieldId::new(),
                vec![PlayerId::from("1")],
                MatchId::new(),
                2,
                Session::create(1, now()),
                &mut rng,
            )
            .unwrap();

            assert_eq!(field.marked_cell_position(), 1);
        }
    }

    mod hit {
        use super::*;

        #[test]
        fn hit_moves_mark_and_reports_hit_cell() {
            let (mut field, mut rng) = field_with(&[4, 4, 7]);

            let outcome = field.hit(4, &PlayerId::from("1"), now(), &mut rng).unwrap();

            assert_eq!(outcome, HitOutcome::Hit { new_position: 7 });
            assert_eq!(field.marked_cell_position(), 7);
            assert_eq!(
                field.events(),
                &[FieldEvent::MarkedCellHit(MarkedCellHitEvent {
                    player_id: PlayerId::from("1"),
                    game_id: MatchId::from("game-1"),
                    cell_position: 4,
                })]
            );
        }

        #[test]
        fn miss_is_a_silent_no_op() {
            let (mut field, mut rng) = field_with(&[4]);

            let outcome = field.hit(5, &PlayerId::from("2"), now(), &mut rng).unwrap();

            assert_eq!(outcome, HitOutcome::Miss);
            assert_eq!(field.marked_cell_position(), 4);
            assert!(field.events().is_empty());
        }

        #[test]
        fn unknown_player_is_rejected() {
            let (mut field, mut rng) = field_with(&[4]);

            let result = field.hit(4, &PlayerId::from("3"), now(), &mut rng);

            assert!(matches!(result, Err(DomainError::PlayerNotFound { .. })));
            assert_eq!(field.marked_cell_position(), 4);
        }

        #[test]
        fn player_check_comes_before_session_check() {
            let (mut field, mut rng) = field_with(&[4]);
            let late = now() + Duration::minutes(2);

            let result = field.hit(4, &PlayerId::from("3"), late, &mut rng);

            assert!(matches!(result, Err(DomainError::PlayerNotFound { .. })));
        }

        #[test]
        fn hit_after_session_is_rejected() {
            let (mut field, mut rng) = field_with(&[4]);
            let late = now() + Duration::minutes(1);

            let result = field.hit(4, &PlayerId::from("1"), late, &mut rng);

            assert!(matches!(result, Err(DomainError::SessionOver(_))));
            assert!(field.events().is_empty());
        }
    }

    mod relocation {
        use super::*;

        #[test]
        fn change_emits_new_position() {
            let (mut field, mut rng) = field_with(&[2, 6]);

            let position = field.change_marked_cell_position(now(), &mut rng).unwrap();

            assert_eq!(position, 6);
            assert_eq!(
                field.events(),
                &[FieldEvent::MarkedCellPositionChanged(
                    FieldMarkedCellPositionChanged {
                        new_position: 6,
                        game_id: MatchId::from("game-1"),
                        field_id: FieldId::from("field-1"),
                    }
                )]
            );
        }

        #[test]
        fn change_after_session_is_rejected() {
            let (mut field, mut rng) = field_with(&[2]);

            let result =
                field.change_marked_cell_position(now() + Duration::minutes(3), &mut rng);

            assert!(matches!(result, Err(DomainError::SessionOver(_))));
            assert_eq!(field.marked_cell_position(), 2);
        }

        #[test]
        fn every_reposition_differs_from_previous() {
            // Each scripted draw repeats the current mark before offering a new one.
            let (mut field, mut rng) = field_with(&[0, 0, 1, 1, 1, 0, 0, 8]);
            let mut previous = field.marked_cell_position();

            for _ in 0..20 {
                let next = field.change_marked_cell_position(now(), &mut rng).unwrap();
                assert_ne!(next, previous);
                assert!(next < field.size());
                previous = next;
            }
            assert_eq!(field.events().len(), 20);
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn round_trip_drops_pending_events() {
            let (mut field, mut rng) = field_with(&[3, 5]);
            field.change_marked_cell_position(now(), &mut rng).unwrap();

            let json = serde_json::to_string(&field).unwrap();
            let restored: Field = serde_json::from_str(&json).unwrap();

            assert_eq!(restored.marked_cell_position(), 5);
            assert_eq!(restored.player_ids(), field.player_ids());
            assert!(restored.events().is_empty());
        }

        #[test]
        fn rejects_mark_outside_board() {
            let json = format!(
                r#"{{"id":"f","playerIds":["1"],"gameId":"g","session":{},"markedCellPosition":9,"size":9}}"#,
                serde_json::to_string(&Session::create(1, now())).unwrap()
            );

            assert!(serde_json::from_str::<Field>(&json).is_err());
        }
    }
}
