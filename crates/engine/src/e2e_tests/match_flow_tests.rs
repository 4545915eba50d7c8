//! Full match lifecycle: lobby, play, close, settle.

use super::*;
use crate::infrastructure::ports::EventPublisher;
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::{FieldError, MatchError, TickReport};
use whackbet_domain::{
    BetStatus, DomainError, DomainEvent, HitOutcome, JoinOutcome, MatchState, PlayerId,
};

#[tokio::test]
async fn match_plays_out_and_settles_bets_for_the_leader() {
    let mut ctx = E2EContext::new(EngineSettings::default());

    // Lobby fills and the session starts
    let game_id = ctx.started_match(&[("p1", "Alice"), ("p2", "Bob")]).await;
    let delivered = ctx.pump().await;
    assert_eq!(event_types(&delivered), vec!["match_started"]);
    assert_eq!(ctx.game(&game_id).await.state(), MatchState::Started);

    // The reaction laid out the board
    let field = ctx.field(&game_id).await;
    assert_eq!(field.size(), 9);
    assert_eq!(field.session().started_at(), start_time());
    assert_eq!(field.player_ids().len(), 2);

    let bet = ctx
        .app
        .use_cases
        .bet
        .place
        .execute(
            game_id.clone(),
            10.0,
            vec![PlayerId::from("p1"), PlayerId::from("p2")],
        )
        .await
        .unwrap();

    // Bob hits the mark and scores with the hit
    let outcome = ctx
        .app
        .use_cases
        .field
        .hit
        .execute(game_id.clone(), PlayerId::from("p2"), field.marked_cell_position())
        .await
        .unwrap();
    let HitOutcome::Hit { new_position } = outcome else {
        panic!("expected a hit, got {outcome:?}");
    };
    assert_ne!(new_position, field.marked_cell_position());
    assert_eq!(event_types(&ctx.pump().await), vec!["marked_cell_hit"]);

    let game = ctx.game(&game_id).await;
    assert_eq!(game.player(&PlayerId::from("p2")).unwrap().score(), 1);
    assert_eq!(game.player(&PlayerId::from("p1")).unwrap().score(), 0);

    // Alice misses
    let miss = ctx
        .app
        .use_cases
        .field
        .hit
        .execute(game_id.clone(), PlayerId::from("p1"), (new_position + 1) % 9)
        .await
        .unwrap();
    assert_eq!(miss, HitOutcome::Miss);
    assert!(ctx.pump().await.is_empty());

    // The ticker moves the mark while the session runs
    let ticker = ctx.app.relocation_ticker();
    assert_eq!(
        ticker.tick().await.unwrap(),
        TickReport {
            relocated: 1,
            finished: 0
        }
    );
    assert_eq!(
        event_types(&ctx.pump().await),
        vec!["field_marked_cell_position_changed"]
    );
    assert_ne!(ctx.field(&game_id).await.marked_cell_position(), new_position);

    // Time runs out
    ctx.clock.advance(chrono::Duration::minutes(1));
    let late = ctx
        .app
        .use_cases
        .field
        .hit
        .execute(game_id.clone(), PlayerId::from("p2"), 0)
        .await;
    assert!(matches!(
        late,
        Err(FieldError::Domain(DomainError::SessionOver(_)))
    ));

    assert_eq!(
        ticker.tick().await.unwrap(),
        TickReport {
            relocated: 0,
            finished: 1
        }
    );
    let delivered = ctx.pump().await;
    assert_eq!(
        event_types(&delivered),
        vec!["match_finished", "bet_finished"]
    );
    match &delivered[1] {
        DomainEvent::BetFinished(e) => {
            assert_eq!(e.bet_id, *bet.id());
            assert_eq!(e.winner_player_id.as_str(), "p2");
            assert_eq!(e.amount, 10.0);
        }
        other => panic!("expected BetFinished, got {other:?}"),
    }

    let game = ctx.game(&game_id).await;
    assert_eq!(game.state(), MatchState::Finished);
    assert_eq!(game.finished_at(), Some(start_time() + chrono::Duration::minutes(1)));

    let settled = ctx
        .app
        .repositories
        .bets
        .get(bet.id().clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status(), BetStatus::Finished);
    assert_eq!(settled.winner_player_id().map(PlayerId::as_str), Some("p2"));

    // Nothing left to do on the next tick
    assert_eq!(ticker.tick().await.unwrap(), TickReport::default());
    assert!(ctx.pump().await.is_empty());
}

#[tokio::test]
async fn lobby_waits_for_a_full_roster() {
    let settings = EngineSettings {
        max_players: 3,
        ..EngineSettings::default()
    };
    let mut ctx = E2EContext::new(settings);

    let game = ctx
        .app
        .use_cases
        .matches
        .create
        .execute(PlayerId::from("p1"), "Alice")
        .await
        .unwrap();
    let join = &ctx.app.use_cases.matches.join;

    let second = join
        .execute(game.id().clone(), PlayerId::from("p2"), "Bob")
        .await
        .unwrap();
    assert_eq!(
        second,
        JoinOutcome::Waiting {
            joined: 2,
            max_players: 3
        }
    );

    let third = join
        .execute(game.id().clone(), PlayerId::from("p3"), "Carol")
        .await
        .unwrap();
    assert!(matches!(third, JoinOutcome::MatchStarted { session } if session.started_at() == start_time()));

    let fourth = join
        .execute(game.id().clone(), PlayerId::from("p4"), "Dave")
        .await;
    assert!(matches!(
        fourth,
        Err(MatchError::Domain(DomainError::MatchAlreadyStarted { max_players: 3, .. }))
    ));

    let delivered = ctx.pump().await;
    assert_eq!(event_types(&delivered), vec!["match_started"]);
    assert_eq!(ctx.field(game.id()).await.player_ids().len(), 3);
}

#[tokio::test]
async fn simultaneous_hits_on_the_mark_score_once() {
    let mut ctx = E2EContext::new(EngineSettings::default());
    let game_id = ctx.started_match(&[("p1", "Alice"), ("p2", "Bob")]).await;
    ctx.pump().await;
    let marked = ctx.field(&game_id).await.marked_cell_position();

    let hit = &ctx.app.use_cases.field.hit;
    let (first, second) = tokio::join!(
        hit.execute(game_id.clone(), PlayerId::from("p1"), marked),
        hit.execute(game_id.clone(), PlayerId::from("p2"), marked),
    );

    let hits = [first.unwrap(), second.unwrap()]
        .iter()
        .filter(|outcome| outcome.is_hit())
        .count();
    assert_eq!(hits, 1);
    assert_eq!(event_types(&ctx.pump().await), vec!["marked_cell_hit"]);

    let game = ctx.game(&game_id).await;
    let total: u32 = game.players().iter().map(|p| p.score()).sum();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn repeated_match_started_keeps_one_field() {
    let mut ctx = E2EContext::new(EngineSettings::default());
    let game_id = ctx.started_match(&[("p1", "Alice"), ("p2", "Bob")]).await;
    let delivered = ctx.pump().await;
    let original = ctx.field(&game_id).await;

    ctx.app.event_bus.publish(delivered);
    ctx.pump().await;

    let field = ctx.field(&game_id).await;
    assert_eq!(field.id(), original.id());
    assert_eq!(field.marked_cell_position(), original.marked_cell_position());
}

#[tokio::test]
async fn hit_in_the_last_second_counts_when_delivered_after_the_end() {
    let mut ctx = E2EContext::new(EngineSettings::default());
    let game_id = ctx.started_match(&[("p1", "Alice"), ("p2", "Bob")]).await;
    ctx.pump().await;
    let bet = ctx
        .app
        .use_cases
        .bet
        .place
        .execute(
            game_id.clone(),
            10.0,
            vec![PlayerId::from("p1"), PlayerId::from("p2")],
        )
        .await
        .unwrap();

    ctx.clock.advance(chrono::Duration::seconds(59));
    let marked = ctx.field(&game_id).await.marked_cell_position();
    let outcome = ctx
        .app
        .use_cases
        .field
        .hit
        .execute(game_id.clone(), PlayerId::from("p2"), marked)
        .await
        .unwrap();
    assert!(outcome.is_hit());

    // The session closes before anyone sees the hit event
    ctx.clock.advance(chrono::Duration::seconds(1));
    let ticker = ctx.app.relocation_ticker();
    assert_eq!(
        ticker.tick().await.unwrap(),
        TickReport {
            relocated: 0,
            finished: 1
        }
    );

    let delivered = ctx.pump().await;
    assert_eq!(
        event_types(&delivered),
        vec!["marked_cell_hit", "match_finished", "bet_finished"]
    );

    let game = ctx.game(&game_id).await;
    assert_eq!(game.player(&PlayerId::from("p2")).unwrap().score(), 1);
    assert_eq!(game.player(&PlayerId::from("p1")).unwrap().score(), 0);

    let settled = ctx
        .app
        .repositories
        .bets
        .get(bet.id().clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.winner_player_id().map(PlayerId::as_str), Some("p2"));
}
