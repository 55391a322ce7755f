use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const COURT_HALF_WIDTH: f32 = 4.115;
pub const COURT_HALF_LENGTH: f32 = 11.89;
pub const COURT_MAX_HEIGHT: f32 = 30.0;
pub const NET_POSITION_Z: f32 = 0.0;
pub const NET_HEIGHT: f32 = 0.914;

/// Court geometry. The net lies in the plane `z = net_z`; each player owns one half.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub half_width: f32,
    pub half_length: f32,
    pub max_height: f32,
    pub net_z: f32,
    pub net_height: f32,
}

impl Default for Court {
    fn default() -> Self {
        Self {
            half_width: COURT_HALF_WIDTH,
            half_length: COURT_HALF_LENGTH,
            max_height: COURT_MAX_HEIGHT,
            net_z: NET_POSITION_Z,
            net_height: NET_HEIGHT,
        }
    }
}

impl Court {
    pub fn is_in_court(&self, p: Vec3) -> bool {
        !(p.x.abs() > self.half_width || p.z.abs() > self.half_length || p.y > self.max_height)
    }

    /// Touching the net plane exactly counts as a crossing.
    pub fn net_crossed(&self, previous_z: f32, current_z: f32) -> bool {
        previous_z * current_z < 0.0 || previous_z == self.net_z || current_z == self.net_z
    }

    /// True when the ball crossed the net plane this tick without clearing the tape.
    pub fn is_net_fault(&self, previous_z: f32, position: Vec3) -> bool {
        self.net_crossed(previous_z, position.z) && position.y <= self.net_height
    }
}
