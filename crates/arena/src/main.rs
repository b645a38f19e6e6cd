//! Scripted arena: loads the content tables, builds a runtime and plays one
//! training session against the yard dummies.
//!
//! Environment variables:
//! - `WULIN_DATA_DIR` - content directory (default: the shipped tables)
//! - `WULIN_SESSION_ID` - log session name (default: timestamp)
//! - `WULIN_*` runtime settings, see [`RuntimeConfig::from_env`]
//! - `RUST_LOG` - log filter (default: `info`)
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{info, warn};
use wulin_content::ContentFactory;
use wulin_core::{
    Character, EnabledSkills, EntityId, OpponentRef, RoomId, RoundEvent, SkillBook,
    SkillCategory, TechniqueId,
};
use wulin_runtime::{Event, Narration, Runtime, RuntimeConfig, Topic};

const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::init(std::env::var("WULIN_SESSION_ID").ok())?;

    let data_dir = std::env::var("WULIN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    let bundle = ContentFactory::new(&data_dir)
        .load_bundle()
        .with_context(|| format!("failed to load content from {}", data_dir.display()))?;
    info!(
        rooms = bundle.rooms.len(),
        npcs = bundle.npcs.len(),
        techniques = bundle.techniques.len(),
        "content loaded"
    );

    let runtime = Runtime::builder()
        .config(RuntimeConfig::from_env())
        .content(&bundle)
        .build()?;

    let result = training_session(&runtime).await;
    runtime.shutdown().await;
    result
}

fn wanderer() -> Character {
    Character::new("wanderer", "Wanderer", "temple")
        .with_skills(
            SkillBook::new()
                .with("unarmed", 40)
                .with("iron-palm", 30)
                .with("force", 20)
                .with("dodge", 20),
        )
        .with_enabled(EnabledSkills::new().with(SkillCategory::Unarmed, "iron-palm"))
}

async fn training_session(runtime: &Runtime) -> Result<()> {
    let player = EntityId::new("wanderer");
    let mut room = runtime.subscribe(Topic::Room);
    let mut progress = runtime.subscribe(Topic::Progress);

    runtime.register_player(wanderer()).await;
    runtime
        .relocate_player(&player, &RoomId::new("training-yard"))
        .await?;

    info!("sparring with the first dummy");
    runtime
        .engage(&player, &OpponentRef::nth("training-dummy", 0), false)
        .await?;
    fight(runtime, &player, &mut room).await?;

    info!("breaking the second dummy");
    runtime
        .engage(&player, &OpponentRef::nth("training-dummy", 1), true)
        .await?;
    match runtime
        .perform_technique(&player, &TechniqueId::new("thunder-palm"), None)
        .await
    {
        Ok(report) => info!(events = report.events.len(), "thunder palm landed"),
        Err(error) => warn!(%error, "thunder palm refused"),
    }
    fight(runtime, &player, &mut room).await?;

    while let Ok(event) = progress.try_recv() {
        info!(target: "arena", ?event, "progress");
    }
    let wanderer = runtime.player(&player).await?;
    info!(
        potential = wanderer.combat.potential,
        kills = wanderer.combat.kills,
        health = wanderer.resources.health,
        "session over"
    );
    Ok(())
}

/// Runs the current engagement to its end, narrating as it goes. Rounds are
/// driven here when the runtime does not tick on its own.
async fn fight(
    runtime: &Runtime,
    player: &EntityId,
    room: &mut broadcast::Receiver<Event>,
) -> Result<()> {
    if runtime.is_ticking(player).await? {
        loop {
            let event = room.recv().await?;
            if narrate(&event) {
                return Ok(());
            }
        }
    }

    loop {
        let report = runtime.advance_tick(player).await?;
        while let Ok(event) = room.try_recv() {
            narrate(&event);
        }
        if report.end.is_some() {
            return Ok(());
        }
    }
}

/// Logs one room event. Returns whether it closes the engagement.
fn narrate(event: &Event) -> bool {
    let Event::Room(event) = event else {
        return false;
    };
    info!(
        target: "arena",
        room = %event.room,
        origin = %event.origin,
        narration = ?event.narration,
        "narration"
    );
    matches!(
        event.narration,
        Narration::Disengaged { .. }
            | Narration::Combat(RoundEvent::PlayerDied { .. } | RoundEvent::PlayerEjected { .. })
    )
}
