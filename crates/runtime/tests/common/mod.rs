//! Shared fixture world for the runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::broadcast;
use wulin_content::ContentBundle;
use wulin_core::{
    Attributes, Character, EnabledSkills, EntityId, ItemDefinition, LootDrop, NpcTemplate,
    OpponentKey, RngOracle, RoomDefinition, RoomId, SkillBook, SkillCategory,
    TechniqueDefinition, TechniqueKind, TemplateId,
};
use wulin_runtime::{
    Event, InMemoryStore, ManualClock, OracleManager, Runtime, RuntimeConfig, WriteMode,
};

/// Returns the same value for every seed. With 100 every strike from a
/// perceptive attacker lands and jitter is neutral.
#[derive(Debug, Clone, Copy)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

pub const START_MS: i64 = 1_000;

/// - `temple`: safe, the hero's respawn point
/// - `yard`: two training dummies (attack 0, defense 20, loot 100% straw)
/// - `hall`: three thugs (all attributes 0)
/// - `pass`: one aggressive brute (attack 120, hit 200)
/// - `limbo`: safe
pub fn bundle() -> ContentBundle {
    let mut bundle = ContentBundle::default();

    bundle
        .items
        .insert("straw".into(), ItemDefinition::armor("bundle of straw", 0));

    let mut dummy = NpcTemplate::new("Training Dummy");
    dummy.attributes = Attributes::new(0, 10, 0, 0, 0, 0);
    dummy.loot = vec![LootDrop::new("straw", 1.0)];
    bundle.npcs.insert("dummy".into(), dummy);

    let mut thug = NpcTemplate::new("Thug");
    thug.attributes = Attributes::uniform(0);
    bundle.npcs.insert("thug".into(), thug);

    let mut brute = NpcTemplate::new("Brute");
    brute.attributes = Attributes::new(60, 0, 100, 0, 0, 0);
    brute.aggressive = true;
    bundle.npcs.insert("brute".into(), brute);

    bundle.techniques.insert(
        "strike".into(),
        TechniqueDefinition::new("Iron Strike", "iron-palm", SkillCategory::Unarmed, TechniqueKind::Single)
            .with_cost(10, 4_000),
    );
    bundle.techniques.insert(
        "storm".into(),
        TechniqueDefinition::new("Palm Storm", "iron-palm", SkillCategory::Unarmed, TechniqueKind::Aoe)
            .with_cost(30, 10_000),
    );

    for (id, room) in [
        ("temple", RoomDefinition::new("Temple").safe()),
        ("yard", RoomDefinition::new("Yard").with_roster("dummy", 2)),
        ("hall", RoomDefinition::new("Hall").with_roster("thug", 3)),
        ("pass", RoomDefinition::new("Pass").with_roster("brute", 1)),
        ("limbo", RoomDefinition::new("Ghost Gate").safe()),
    ] {
        bundle.rooms.insert(id.into(), room);
    }
    bundle
}

pub struct World {
    pub runtime: Runtime,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryStore>,
}

/// Rounds only advance through `advance_tick`; store writes land before each
/// call returns.
pub fn world() -> World {
    build(false)
}

/// Engagements start a real ticker (drive it with paused tokio time).
pub fn ticking_world() -> World {
    build(true)
}

fn build(auto_tick: bool) -> World {
    let bundle = bundle();
    let clock = Arc::new(ManualClock::new(START_MS));
    let store = Arc::new(InMemoryStore::new());
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            write_mode: WriteMode::Inline,
            auto_tick,
            seed: Some(7),
            ..RuntimeConfig::default()
        })
        .combat_config(bundle.config.clone())
        .oracles(OracleManager::from_bundle(&bundle).with_rng(Arc::new(FixedRng(100))))
        .store(store.clone())
        .clock(clock.clone())
        .build()
        .expect("fixture runtime builds");
    World {
        runtime,
        clock,
        store,
    }
}

/// Attack 50, defense 20, hit 200, dodge 100, no skills.
pub fn hero(room: &str) -> Character {
    Character::new("hero", "Hero", room)
        .with_attributes(Attributes::new(25, 10, 100, 0, 0, 0))
        .with_respawn_point("temple")
}

/// Attack 40 unarmed with `iron-palm` enabled; every technique in the bundle
/// is available.
pub fn adept(id: &str, room: &str) -> Character {
    Character::new(id, "Adept", room)
        .with_attributes(Attributes::new(5, 0, 100, 0, 0, 0))
        .with_skills(SkillBook::new().with("unarmed", 20).with("iron-palm", 10))
        .with_enabled(EnabledSkills::new().with(SkillCategory::Unarmed, "iron-palm"))
}

pub fn key(room: &str, template: &str, index: u32) -> OpponentKey {
    OpponentKey::new(RoomId::new(room), TemplateId::new(template), index)
}

pub fn id(value: &str) -> EntityId {
    EntityId::new(value)
}

/// Everything published so far on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
