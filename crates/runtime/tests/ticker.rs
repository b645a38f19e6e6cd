mod common;

use std::time::Duration;

use common::{START_MS, drain, hero, id, key, ticking_world, world};
use tokio::time::sleep;
use wulin_core::{CharacterState, EntityId, OpponentRef, RoomId, RoundEnd};
use wulin_runtime::{Event, OpponentRepository, ProgressEvent, Runtime, Topic};

async fn dummy_health(runtime: &Runtime, index: u32) -> Option<u32> {
    runtime
        .engagements(&id("hero"))
        .await
        .unwrap()
        .get(&key("yard", "dummy", index))
        .map(|entry| entry.current_health)
}

/// Walks into the brute's pass and lets it knock out, then kill, the player.
async fn die_in_the_pass(runtime: &Runtime, player: &EntityId) {
    runtime.relocate_player(player, &RoomId::new("pass")).await.unwrap();
    runtime.advance_tick(player).await.unwrap();
    let report = runtime.advance_tick(player).await.unwrap();
    assert_eq!(report.end, Some(RoundEnd::Died));
}

async fn location(runtime: &Runtime, player: &EntityId) -> String {
    runtime.player(player).await.unwrap().location.as_str().to_owned()
}

#[tokio::test(start_paused = true)]
async fn rounds_follow_the_tick_interval() {
    let world = ticking_world();
    let runtime = &world.runtime;
    runtime.register_player(hero("yard")).await;
    let hero = id("hero");

    runtime.engage(&hero, &OpponentRef::nth("dummy", 0), false).await.unwrap();
    assert!(runtime.is_ticking(&hero).await.unwrap());

    sleep(Duration::from_millis(1_900)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(100));

    sleep(Duration::from_millis(200)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(85));

    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(70));

    // Seven rounds in all; the ticker stops itself with the match.
    sleep(Duration::from_millis(12_000)).await;
    assert!(runtime.engagements(&hero).await.unwrap().is_empty());
    assert!(!runtime.is_ticking(&hero).await.unwrap());
    let player = runtime.player(&hero).await.unwrap();
    assert_eq!(player.state, CharacterState::Normal);
    assert_eq!(player.combat.potential, 5);
}

#[tokio::test(start_paused = true)]
async fn engaging_more_opponents_keeps_one_ticker() {
    let world = ticking_world();
    let runtime = &world.runtime;
    runtime.register_player(hero("yard")).await;
    let hero = id("hero");

    runtime.engage(&hero, &OpponentRef::nth("dummy", 0), false).await.unwrap();
    runtime.engage(&hero, &OpponentRef::nth("dummy", 1), false).await.unwrap();

    sleep(Duration::from_millis(2_100)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(85));
    assert_eq!(dummy_health(runtime, 1).await, Some(100));
}

#[tokio::test(start_paused = true)]
async fn disengaging_cancels_pending_rounds() {
    let world = ticking_world();
    let runtime = &world.runtime;
    runtime.register_player(hero("yard")).await;
    let hero = id("hero");
    let dummy = key("yard", "dummy", 0);

    runtime.engage(&hero, &OpponentRef::nth("dummy", 0), true).await.unwrap();
    sleep(Duration::from_millis(2_100)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(70));

    runtime.disengage(&hero).await.unwrap();
    assert!(!runtime.is_ticking(&hero).await.unwrap());

    sleep(Duration::from_millis(10_000)).await;
    let record = world.store.opponent(&dummy).await.unwrap().unwrap();
    assert_eq!(record.health, 70);
    assert_eq!(
        runtime.player(&hero).await.unwrap().state,
        CharacterState::Normal
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_every_ticker() {
    let world = ticking_world();
    let runtime = &world.runtime;
    runtime.register_player(hero("yard")).await;
    let hero = id("hero");

    runtime.engage(&hero, &OpponentRef::nth("dummy", 0), true).await.unwrap();
    runtime.shutdown().await;
    assert!(!runtime.is_ticking(&hero).await.unwrap());

    sleep(Duration::from_millis(6_100)).await;
    assert_eq!(dummy_health(runtime, 0).await, Some(100));
}

#[tokio::test(start_paused = true)]
async fn the_dead_return_to_their_respawn_point_after_the_delay() {
    let world = world();
    let runtime = &world.runtime;
    let delay = runtime.combat_config().limbo_return_delay_ms as u64;
    runtime.register_player(hero("temple")).await;
    let hero = id("hero");
    let mut progress = runtime.subscribe(Topic::Progress);

    die_in_the_pass(runtime, &hero).await;
    sleep(Duration::from_millis(delay - 1_000)).await;
    assert_eq!(location(runtime, &hero).await, "limbo");

    sleep(Duration::from_millis(2_000)).await;
    let player = runtime.player(&hero).await.unwrap();
    assert_eq!(player.location.as_str(), "temple");
    assert_eq!(player.state, CharacterState::Normal);
    assert_eq!(player.limbo_return_at, None);
    assert_eq!(
        drain(&mut progress).last(),
        Some(&Event::Progress(ProgressEvent::ReturnedFromLimbo {
            player: hero.clone(),
            room: RoomId::new("temple"),
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn leaving_limbo_early_cancels_the_return() {
    let world = world();
    let runtime = &world.runtime;
    let delay = runtime.combat_config().limbo_return_delay_ms as u64;
    runtime.register_player(hero("temple")).await;
    let hero = id("hero");

    die_in_the_pass(runtime, &hero).await;
    sleep(Duration::from_millis(10_000)).await;
    runtime.relocate_player(&hero, &RoomId::new("yard")).await.unwrap();

    let mut progress = runtime.subscribe(Topic::Progress);
    sleep(Duration::from_millis(delay)).await;
    assert_eq!(location(runtime, &hero).await, "yard");
    assert!(drain(&mut progress).is_empty());
}

#[tokio::test(start_paused = true)]
async fn an_earlier_death_does_not_shorten_the_next_stay_in_limbo() {
    let world = world();
    let runtime = &world.runtime;
    let config = runtime.combat_config().clone();
    let delay = config.limbo_return_delay_ms as u64;
    runtime.register_player(hero("temple")).await;
    let hero = id("hero");

    die_in_the_pass(runtime, &hero).await;
    sleep(Duration::from_millis(10_000)).await;
    runtime.relocate_player(&hero, &RoomId::new("temple")).await.unwrap();

    // The brute's wounds are forgotten once its record goes stale.
    let second_death = START_MS + config.record_stale_ms + 1_000;
    world.clock.set(second_death);
    die_in_the_pass(runtime, &hero).await;
    assert_eq!(
        runtime.player(&hero).await.unwrap().limbo_return_at,
        Some(second_death + config.limbo_return_delay_ms)
    );

    // The first death's timer fires here and must leave the player be.
    sleep(Duration::from_millis(delay - 5_000)).await;
    let player = runtime.player(&hero).await.unwrap();
    assert_eq!(player.location.as_str(), "limbo");
    assert_eq!(player.state, CharacterState::Dead);

    sleep(Duration::from_millis(6_000)).await;
    let player = runtime.player(&hero).await.unwrap();
    assert_eq!(player.location.as_str(), "temple");
    assert_eq!(player.state, CharacterState::Normal);
}
