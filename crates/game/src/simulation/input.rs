use crate::ability::{AbilityTrigger, AbilityType};
use crate::event::GameEvent;
use crate::net::ClientMessage;
use crate::phase::GamePhase;
use crate::player::{MoveInput, PlayerId, SwingInput, SwingModifiers};

use super::GameState;

/// Moves `player_id` for one tick of held keys. Returns whether any key was held.
pub fn apply_movement(
    state: &mut GameState,
    player_id: PlayerId,
    input: MoveInput,
    dt: f32,
) -> bool {
    let sprinting = state
        .abilities
        .get(player_id)
        .is_some_and(|a| a.is_active(AbilityType::Sprint));
    let net_z = state.court().net_z;
    let controller = state.controller().clone();

    let Some(player) = state.player_mut(player_id) else {
        return false;
    };
    if !controller.apply_movement(player, input, sprinting, net_z, dt) {
        return false;
    }

    state.push_event(GameEvent::PlayerMoved { player_id });
    true
}

/// Resolves a swing. Out-of-phase, out-of-reach and too-weak swings are ignored.
/// Returns whether the ball was struck.
pub fn apply_swing(state: &mut GameState, player_id: PlayerId, swing: &SwingInput) -> bool {
    let phase = state.phase();
    if !phase.is_swing_allowed() {
        return false;
    }
    let Some(hitter) = state.player(player_id).cloned() else {
        log::warn!("Swing from invalid player id {}", player_id);
        return false;
    };

    let ability = state.abilities[player_id];
    let modifiers = SwingModifiers {
        giant: ability.is_active(AbilityType::Giant),
        speed_up: ability.is_active(AbilityType::SpeedUp),
    };

    let controller = state.controller();
    if !controller.is_swing(swing) || !controller.can_reach(&hitter, &state.ball, modifiers) {
        return false;
    }

    let net_z = state.court().net_z;
    let controller = controller.clone();
    controller.strike(&hitter, &mut state.ball, swing, modifiers, net_z);

    if modifiers.speed_up && state.abilities[player_id].consume(AbilityType::SpeedUp) {
        state.push_event(GameEvent::AbilityChanged {
            player_id,
            ability: AbilityType::None,
        });
    }

    log::debug!(
        "Player {} struck the ball ({:?} shot, rally {})",
        player_id,
        swing.shot,
        state.ball.hit_count
    );
    state.push_event(GameEvent::BallStruck {
        player_id,
        hit_count: state.ball.hit_count,
    });

    if phase == GamePhase::StartGame {
        state.set_phase(GamePhase::InRally);
    }
    true
}

/// Applies an ability press or release. Returns whether the player's ability changed.
pub fn apply_ability_request(
    state: &mut GameState,
    player_id: PlayerId,
    ability: AbilityType,
    trigger: AbilityTrigger,
) -> bool {
    let Some(slot) = state.abilities.get_mut(player_id) else {
        log::warn!("Ability request from invalid player id {}", player_id);
        return false;
    };
    if !slot.handle_request(ability, trigger) {
        return false;
    }

    let active = slot.active_ability;
    state.push_event(GameEvent::AbilityChanged {
        player_id,
        ability: active,
    });
    true
}

pub fn apply_client_message(
    state: &mut GameState,
    player_id: PlayerId,
    message: &ClientMessage,
    dt: f32,
) -> bool {
    match message {
        ClientMessage::Input(input) => apply_movement(state, player_id, *input, dt),
        ClientMessage::Swing(swing) => apply_swing(state, player_id, swing),
        ClientMessage::AbilityRequest { ability, trigger } => {
            apply_ability_request(state, player_id, *ability, *trigger)
        }
    }
}
