use glam::Vec3;

use crate::player::PlayerId;

use super::vector;

pub const GRAVITY: f32 = 9.8;
pub const GROUND_Y: f32 = 0.0;
pub const BOUNCE_RESTITUTION: f32 = 0.7;

pub const BALL_SERVE_HEIGHT: f32 = 1.0;
pub const PLAYER_BASELINE_DISTANCE: f32 = 11.89;
pub const BALL_SERVE_OFFSET: f32 = 0.5;
pub const SERVE_POSITION_Z: f32 = PLAYER_BASELINE_DISTANCE - BALL_SERVE_OFFSET;

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Z coordinate before the most recent integration step.
    pub previous_z: f32,
    /// Ground contacts since the ball was last struck.
    pub bounce_count: u32,
    /// Hits in the current rally.
    pub hit_count: u32,
    pub last_hit_player_id: PlayerId,
    pub gravity_multiplier: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Ball {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, BALL_SERVE_HEIGHT, 0.0),
            velocity: Vec3::ZERO,
            previous_z: 0.0,
            bounce_count: 0,
            hit_count: 0,
            last_hit_player_id: 0,
            gravity_multiplier: 1.0,
        }
    }

    /// Ball parked at `server`'s serve spot. Player 0 serves from the +z side.
    pub fn serve_position(server: PlayerId) -> Vec3 {
        let z = if server == 0 {
            SERVE_POSITION_Z
        } else {
            -SERVE_POSITION_Z
        };
        Vec3::new(0.0, BALL_SERVE_HEIGHT, z)
    }

    pub fn integrate(&mut self, dt: f32) {
        self.previous_z = self.position.z;

        let gravity_mult = if self.gravity_multiplier > 0.0 {
            self.gravity_multiplier
        } else {
            1.0
        };

        self.velocity.y -= GRAVITY * gravity_mult * dt;
        self.position = vector::add(self.position, vector::scale(self.velocity, dt));
    }

    /// Reflects the ball off the ground plane. Only fires while moving downward at or
    /// below `ground_y`; the caller owns `bounce_count`.
    pub fn bounce(&mut self, ground_y: f32, restitution: f32) -> bool {
        if self.position.y <= ground_y && self.velocity.y < 0.0 {
            self.position.y = ground_y;
            self.velocity.y = -self.velocity.y * restitution;
            true
        } else {
            false
        }
    }

    pub fn racket_hit(&mut self, direction: Vec3, speed: f32) {
        self.velocity = vector::scale(vector::normalize(direction), speed);
    }

    pub fn reset_for_serve(&mut self, server: PlayerId) {
        self.position = Self::serve_position(server);
        self.velocity = Vec3::ZERO;
        self.last_hit_player_id = server;
        self.bounce_count = 0;
        self.hit_count = 0;
        self.previous_z = self.position.z;
        self.gravity_multiplier = 1.0;

        log::debug!(
            "Ball reset for player {} serve at ({:.2}, {:.2}, {:.2})",
            server,
            self.position.x,
            self.position.y,
            self.position.z
        );
    }
}
