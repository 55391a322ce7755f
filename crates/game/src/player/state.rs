use glam::Vec3;

use crate::physics::{GROUND_Y, PLAYER_BASELINE_DISTANCE};

use super::PlayerId;

pub const PLAYER_NAME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec3,
    pub speed: f32,
    pub name: String,
    pub connected: bool,
}

impl Player {
    pub fn new(id: PlayerId, speed: f32) -> Self {
        Self {
            id,
            position: Self::spawn_position(id),
            speed,
            name: format!("Player{}", id + 1),
            connected: false,
        }
    }

    /// Baseline centre of the player's own half. Player 0 owns +z.
    pub fn spawn_position(id: PlayerId) -> Vec3 {
        let z = if id == 0 {
            PLAYER_BASELINE_DISTANCE
        } else {
            -PLAYER_BASELINE_DISTANCE
        };
        Vec3::new(0.0, GROUND_Y, z)
    }

    pub fn set_name(&mut self, name: &str) {
        let mut end = name.len().min(PLAYER_NAME_LEN - 1);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        self.name = name[..end].to_string();
    }
}
