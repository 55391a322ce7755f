mod input;
mod state;
mod tick;

pub use input::{apply_ability_request, apply_client_message, apply_movement, apply_swing};
pub use state::{GameState, MatchSettings};
pub use tick::{FixedTimestep, step};
