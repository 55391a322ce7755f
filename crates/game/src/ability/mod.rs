mod state;
mod types;

pub use state::{AbilityState, TOGGLE_HELD_FRAMES, tick_abilities};
pub use types::{
    ABILITY_GIANT_RADIUS_MULTIPLIER, ABILITY_SPEED_UP_MULTIPLIER, ABILITY_SPRINT_MULTIPLIER,
    ABILITY_TABLE, AbilityConfig, AbilityKind, AbilityTrigger, AbilityType,
};
