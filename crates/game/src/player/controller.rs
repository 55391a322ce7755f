use bitflags::bitflags;
use glam::Vec3;

use crate::ability::{
    ABILITY_GIANT_RADIUS_MULTIPLIER, ABILITY_SPEED_UP_MULTIPLIER, ABILITY_SPRINT_MULTIPLIER,
};
use crate::physics::{Ball, vector};

use super::{Player, PlayerConfig};

bitflags! {
    /// Held movement keys, as sent in a PlayerInput packet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MoveInput: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const FRONT = 1 << 2;
        const BACK = 1 << 3;
    }
}

impl MoveInput {
    /// Unnormalized horizontal direction: `x = right - left`, `z = front - back`.
    pub fn direction(self) -> Vec3 {
        let axis = |pos: MoveInput, neg: MoveInput| {
            self.contains(pos) as i32 as f32 - self.contains(neg) as i32 as f32
        };
        Vec3::new(
            axis(MoveInput::RIGHT, MoveInput::LEFT),
            0.0,
            axis(MoveInput::FRONT, MoveInput::BACK),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ShotType {
    #[default]
    Normal = 0,
    Lob = 1,
}

impl ShotType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ShotType::Normal),
            1 => Some(ShotType::Lob),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// One accelerometer sample captured at the moment of the swing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwingInput {
    pub acceleration: Vec3,
    pub shot: ShotType,
}

/// Modifiers contributed by the hitter's active ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwingModifiers {
    pub giant: bool,
    pub speed_up: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    config: PlayerConfig,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Moves `player` along the held keys and keeps them on their own side of the net.
    /// Returns whether any movement was requested.
    pub fn apply_movement(
        &self,
        player: &mut Player,
        input: MoveInput,
        sprinting: bool,
        net_z: f32,
        dt: f32,
    ) -> bool {
        let direction = input.direction();
        if direction.length() < self.config.movement_epsilon {
            return false;
        }

        let speed = if sprinting {
            player.speed * ABILITY_SPRINT_MULTIPLIER
        } else {
            player.speed
        };

        let step = vector::scale(vector::normalize(direction), speed * dt);
        player.position = vector::add(player.position, step);
        clamp_to_own_half(player, net_z);
        true
    }

    pub fn swing_radius(&self, modifiers: SwingModifiers) -> f32 {
        if modifiers.giant {
            self.config.swing_radius * ABILITY_GIANT_RADIUS_MULTIPLIER
        } else {
            self.config.swing_radius
        }
    }

    /// A sample below the acceleration threshold is treated as noise, not a swing.
    pub fn is_swing(&self, swing: &SwingInput) -> bool {
        swing.acceleration.length() >= self.config.swing_acceleration_threshold
    }

    pub fn can_reach(&self, player: &Player, ball: &Ball, modifiers: SwingModifiers) -> bool {
        player.position.distance(ball.position) <= self.swing_radius(modifiers)
    }

    /// Maps an accelerometer sample to a unit shot direction aimed at the far half.
    pub fn shot_direction(&self, acceleration: Vec3, hitter_z: f32, net_z: f32) -> Vec3 {
        let cfg = &self.config;
        let forward = if hitter_z >= net_z { -1.0 } else { 1.0 };

        let side = ((acceleration.x / cfg.acc_max_x).clamp(-1.0, 1.0) + 1.0) * 0.5;
        let lift = (acceleration.y.abs() / cfg.acc_max_y).clamp(0.0, 1.0);

        let raw = Vec3::new(
            vector::lerp(cfg.angle_x_min, cfg.angle_x_max, side),
            vector::lerp(cfg.angle_y_min, cfg.angle_y_max, lift),
            forward * cfg.angle_z_base,
        );

        if raw.length() < vector::EPSILON {
            return vector::normalize(Vec3::new(0.0, cfg.fallback_angle_y, forward));
        }
        vector::normalize(raw)
    }

    pub fn shot_speed(&self, acceleration: Vec3) -> f32 {
        (acceleration.length() * self.config.speed_multiplier)
            .clamp(self.config.speed_min, self.config.speed_max)
    }

    /// Strikes the ball for `hitter`. Reach, phase and threshold checks belong to the caller.
    pub fn strike(
        &self,
        hitter: &Player,
        ball: &mut Ball,
        swing: &SwingInput,
        modifiers: SwingModifiers,
        net_z: f32,
    ) {
        let direction = self.shot_direction(swing.acceleration, hitter.position.z, net_z);
        let mut speed = self.shot_speed(swing.acceleration);

        if swing.shot == ShotType::Lob {
            speed *= self.config.lob_speed_multiplier;
        }
        if modifiers.speed_up {
            speed *= ABILITY_SPEED_UP_MULTIPLIER;
        }

        ball.racket_hit(direction, speed);

        match swing.shot {
            ShotType::Lob => {
                ball.velocity.y *= self.config.lob_y_boost;
                ball.velocity.z *= self.config.lob_z_boost;
                ball.gravity_multiplier = self.config.lob_gravity_multiplier;
            }
            ShotType::Normal => ball.gravity_multiplier = 1.0,
        }

        ball.last_hit_player_id = hitter.id;
        ball.bounce_count = 0;
        ball.hit_count += 1;
    }
}

fn clamp_to_own_half(player: &mut Player, net_z: f32) {
    if player.id == 0 {
        player.position.z = player.position.z.max(net_z);
    } else {
        player.position.z = player.position.z.min(net_z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NET_POSITION_Z;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn move_input_direction() {
        assert_eq!(MoveInput::RIGHT.direction(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!((MoveInput::LEFT | MoveInput::BACK).direction(), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!((MoveInput::LEFT | MoveInput::RIGHT).direction(), Vec3::ZERO);
    }

    #[test]
    fn movement_uses_normalized_direction() {
        let controller = PlayerController::default();
        let mut player = Player::new(0, 6.0);
        let start = player.position;

        let input = MoveInput::RIGHT | MoveInput::BACK;
        assert!(controller.apply_movement(&mut player, input, false, NET_POSITION_Z, DT));
        let travelled = player.position.distance(start);
        assert!((travelled - 6.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn empty_input_does_not_move() {
        let controller = PlayerController::default();
        let mut player = Player::new(1, 6.0);
        let start = player.position;
        let input = MoveInput::empty();
        assert!(!controller.apply_movement(&mut player, input, false, NET_POSITION_Z, DT));
        assert_eq!(player.position, start);
    }

    #[test]
    fn sprint_scales_movement() {
        let controller = PlayerController::default();
        let mut player = Player::new(0, 4.0);
        let start = player.position;
        controller.apply_movement(&mut player, MoveInput::RIGHT, true, NET_POSITION_Z, 1.0);
        assert!((player.position.x - start.x - 4.0 * ABILITY_SPRINT_MULTIPLIER).abs() < 1e-4);
    }

    #[test]
    fn players_never_cross_the_net() {
        let controller = PlayerController::default();

        let mut near = Player::new(0, 5.0);
        near.position.z = 0.05;
        controller.apply_movement(&mut near, MoveInput::BACK, false, NET_POSITION_Z, 1.0);
        assert_eq!(near.position.z, NET_POSITION_Z);

        let mut far = Player::new(1, 5.0);
        far.position.z = -0.05;
        controller.apply_movement(&mut far, MoveInput::FRONT, false, NET_POSITION_Z, 1.0);
        assert_eq!(far.position.z, NET_POSITION_Z);
    }

    #[test]
    fn shot_direction_points_at_far_half() {
        let controller = PlayerController::default();
        let acc = Vec3::new(3.0, 10.0, 2.0);

        let from_near = controller.shot_direction(acc, 10.0, NET_POSITION_Z);
        assert!(from_near.z < 0.0);
        assert!((from_near.length() - 1.0).abs() < 1e-5);

        let from_far = controller.shot_direction(acc, -10.0, NET_POSITION_Z);
        assert!(from_far.z > 0.0);
    }

    #[test]
    fn shot_direction_maps_axes() {
        let controller = PlayerController::default();

        let flat = controller.shot_direction(Vec3::new(0.0, 0.0, 10.0), 5.0, NET_POSITION_Z);
        let expected = Vec3::new(0.0, 0.25, -0.55).normalize();
        assert!((flat - expected).length() < 1e-5);

        let wide = controller.shot_direction(Vec3::new(100.0, 100.0, 0.0), 5.0, NET_POSITION_Z);
        let expected = Vec3::new(0.3, 1.0, -0.55).normalize();
        assert!((wide - expected).length() < 1e-5);
    }

    #[test]
    fn shot_direction_falls_back_when_degenerate() {
        let mut config = PlayerConfig::default();
        config.angle_x_min = 0.0;
        config.angle_x_max = 0.0;
        config.angle_y_min = 0.0;
        config.angle_y_max = 0.0;
        config.angle_z_base = 0.0;
        let controller = PlayerController::new(config);

        let dir = controller.shot_direction(Vec3::new(1.0, 1.0, 1.0), 5.0, NET_POSITION_Z);
        let expected = Vec3::new(0.0, 0.5, -1.0).normalize();
        assert!((dir - expected).length() < 1e-5);
    }

    #[test]
    fn shot_speed_is_clamped() {
        let controller = PlayerController::default();
        assert_eq!(controller.shot_speed(Vec3::new(1.0, 0.0, 0.0)), 12.0);
        assert_eq!(controller.shot_speed(Vec3::new(0.0, 18.0, 0.0)), 18.0);
        assert_eq!(controller.shot_speed(Vec3::new(0.0, 0.0, 90.0)), 25.0);
    }

    #[test]
    fn giant_doubles_reach() {
        let controller = PlayerController::default();
        let player = Player::new(0, 5.0);
        let mut ball = Ball::new();
        ball.position = player.position + Vec3::new(7.0, 0.0, 0.0);

        assert!(!controller.can_reach(&player, &ball, SwingModifiers::default()));
        let giant = SwingModifiers { giant: true, speed_up: false };
        assert!(controller.can_reach(&player, &ball, giant));
    }

    #[test]
    fn strike_updates_rally_bookkeeping() {
        let controller = PlayerController::default();
        let player = Player::new(1, 5.0);
        let mut ball = Ball::new();
        ball.bounce_count = 1;
        ball.hit_count = 3;
        ball.gravity_multiplier = 0.8;

        let swing = SwingInput {
            acceleration: Vec3::new(0.0, 18.0, 0.0),
            shot: ShotType::Normal,
        };
        controller.strike(&player, &mut ball, &swing, SwingModifiers::default(), NET_POSITION_Z);

        assert_eq!(ball.last_hit_player_id, 1);
        assert_eq!(ball.bounce_count, 0);
        assert_eq!(ball.hit_count, 4);
        assert_eq!(ball.gravity_multiplier, 1.0);
        assert!((ball.velocity.length() - 18.0).abs() < 1e-3);
        assert!(ball.velocity.z > 0.0);
    }

    #[test]
    fn lob_and_speed_up_modifiers() {
        let controller = PlayerController::default();
        let player = Player::new(0, 5.0);
        let swing = SwingInput {
            acceleration: Vec3::new(0.0, 15.0, 0.0),
            shot: ShotType::Normal,
        };

        let mut plain = Ball::new();
        controller.strike(&player, &mut plain, &swing, SwingModifiers::default(), NET_POSITION_Z);

        let mut boosted = Ball::new();
        let speed_up = SwingModifiers { giant: false, speed_up: true };
        controller.strike(&player, &mut boosted, &swing, speed_up, NET_POSITION_Z);
        assert!((boosted.velocity.length() - 2.0 * plain.velocity.length()).abs() < 1e-3);

        let mut lob = Ball::new();
        let lob_swing = SwingInput { shot: ShotType::Lob, ..swing };
        controller.strike(&player, &mut lob, &lob_swing, SwingModifiers::default(), NET_POSITION_Z);
        assert!((lob.velocity.y - plain.velocity.y * 1.7).abs() < 1e-3);
        assert!((lob.velocity.z - plain.velocity.z * 0.5).abs() < 1e-3);
        assert_eq!(lob.gravity_multiplier, 0.8);
    }
}
