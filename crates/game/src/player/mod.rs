mod config;
mod controller;
mod state;

pub use config::PlayerConfig;
pub use controller::{MoveInput, PlayerController, ShotType, SwingInput, SwingModifiers};
pub use state::{PLAYER_NAME_LEN, Player};

pub type PlayerId = usize;

pub const MAX_PLAYERS: usize = 2;

pub fn opponent(id: PlayerId) -> PlayerId {
    (id + 1) % MAX_PLAYERS
}
