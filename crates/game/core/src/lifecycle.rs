//! Player state transitions around combat: knockout, sparring ejection,
//! death, limbo and waking up.

use crate::config::CombatConfig;
use crate::state::{Character, CharacterState, RoomId};

/// What a death cost and when the player comes back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathReport {
    /// Room the player died in.
    pub died_in: RoomId,
    /// Number of skills that lost a level.
    pub skills_reduced: usize,
    pub limbo: RoomId,
    /// Epoch-ms of the automatic return to the respawn point.
    pub return_at: i64,
}

/// First lethal collapse: health held at 0, still attackable.
pub fn knock_out(player: &mut Character) {
    player.resources.set_health(0);
    player.state = CharacterState::Unconscious;
}

/// Losing a sparring match: out of the fight with 1 health.
pub fn eject(player: &mut Character) {
    player.resources.set_health(1);
    player.state = CharacterState::Normal;
}

/// Second lethal collapse. Every learned skill loses a level, pools refill,
/// and the player is moved to limbo.
pub fn die(player: &mut Character, config: &CombatConfig, now: i64) -> DeathReport {
    let died_in = player.location.clone();
    let skills_reduced = player.skills.decrement_all();
    player.resources.restore_all();
    player.busy_until = 0;
    player.exercising = false;
    player.state = CharacterState::Dead;
    player.location = config.limbo_room.clone();
    let return_at = now.saturating_add(config.limbo_return_delay_ms);
    player.limbo_return_at = Some(return_at);

    DeathReport {
        died_in,
        skills_reduced,
        limbo: config.limbo_room.clone(),
        return_at,
    }
}

/// Leaves combat: fighting players calm down, unconscious ones come to with
/// 1 health. Returns whether the player woke up.
pub fn end_combat(player: &mut Character) -> bool {
    match player.state {
        CharacterState::Fighting => {
            player.state = CharacterState::Normal;
            false
        }
        CharacterState::Unconscious => {
            player.resources.set_health(1);
            player.state = CharacterState::Normal;
            true
        }
        CharacterState::Normal | CharacterState::Dead => false,
    }
}

/// Moves the player to `room`. Leaving limbo clears the dead state and any
/// pending return.
pub fn arrive(player: &mut Character, room: RoomId, config: &CombatConfig) {
    let leaving_limbo = player.location == config.limbo_room && room != config.limbo_room;
    if leaving_limbo {
        player.limbo_return_at = None;
        if player.state == CharacterState::Dead {
            player.state = CharacterState::Normal;
        }
    }
    player.location = room;
}

/// Where a return from limbo sends the player, if one is still due.
///
/// `due` is the `return_at` of the death that scheduled the return; it only
/// fires while that death is the pending one. `None` returns unconditionally.
/// Nothing happens once the player has left limbo.
pub fn return_from_limbo(player: &Character, config: &CombatConfig, due: Option<i64>) -> Option<RoomId> {
    if player.location != config.limbo_room {
        return None;
    }
    if due.is_some() && player.limbo_return_at != due {
        return None;
    }
    Some(player.respawn_point.clone())
}
