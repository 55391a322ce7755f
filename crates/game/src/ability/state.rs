use crate::player::{MAX_PLAYERS, PlayerId};

use super::types::{AbilityKind, AbilityTrigger, AbilityType};

/// Frame count reported for a held toggle. Toggles never count down, any nonzero value
/// means "held".
pub const TOGGLE_HELD_FRAMES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbilityState {
    pub player_id: PlayerId,
    pub active_ability: AbilityType,
    pub remaining_frames: u32,
}

impl AbilityState {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            active_ability: AbilityType::None,
            remaining_frames: 0,
        }
    }

    pub fn is_active(&self, ability: AbilityType) -> bool {
        self.active_ability == ability && self.remaining_frames > 0
    }

    pub fn clear(&mut self) {
        self.active_ability = AbilityType::None;
        self.remaining_frames = 0;
    }

    /// Advances one tick. Returns true when the ability expired on this tick.
    pub fn tick(&mut self) -> bool {
        let Some(kind) = self.active_ability.kind() else {
            return false;
        };
        if kind == AbilityKind::Toggle || self.remaining_frames == 0 {
            return false;
        }

        self.remaining_frames -= 1;
        if self.remaining_frames == 0 {
            self.clear();
            return true;
        }
        false
    }

    /// Applies an activation request. Returns true when the state changed and must be
    /// broadcast.
    pub fn handle_request(&mut self, ability: AbilityType, trigger: AbilityTrigger) -> bool {
        let Some(config) = ability.config() else {
            return false;
        };

        match config.kind {
            AbilityKind::Toggle => match trigger {
                AbilityTrigger::Press => {
                    self.active_ability = ability;
                    self.remaining_frames = TOGGLE_HELD_FRAMES;
                    log::info!("Player {} holds {}", self.player_id, ability.as_str());
                    true
                }
                AbilityTrigger::Release => {
                    if self.active_ability != ability {
                        return false;
                    }
                    self.clear();
                    log::info!("Player {} released {}", self.player_id, ability.as_str());
                    true
                }
            },
            AbilityKind::Timed | AbilityKind::Consumable => {
                if !config.requires_server || trigger != AbilityTrigger::Press {
                    return false;
                }
                self.active_ability = ability;
                self.remaining_frames = config.duration_frames;
                log::info!(
                    "Player {} activated {} for {} frames",
                    self.player_id,
                    ability.as_str(),
                    config.duration_frames
                );
                true
            }
        }
    }

    /// Spends `ability` if it is the active consumable. Returns whether it was spent.
    pub fn consume(&mut self, ability: AbilityType) -> bool {
        if ability.kind() != Some(AbilityKind::Consumable) || !self.is_active(ability) {
            return false;
        }
        self.clear();
        true
    }
}

/// Ticks every player's ability and returns the players whose ability expired.
pub fn tick_abilities(states: &mut [AbilityState; MAX_PLAYERS]) -> Vec<PlayerId> {
    states
        .iter_mut()
        .enumerate()
        .filter_map(|(i, state)| state.tick().then_some(i))
        .collect()
}
