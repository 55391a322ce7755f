use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub movement_epsilon: f32,

    pub swing_radius: f32,
    pub swing_acceleration_threshold: f32,

    pub acc_max_x: f32,
    pub acc_max_y: f32,

    pub angle_x_min: f32,
    pub angle_x_max: f32,
    pub angle_y_min: f32,
    pub angle_y_max: f32,
    pub angle_z_base: f32,

    /// Up component of the fallback shot when the computed direction collapses.
    pub fallback_angle_y: f32,

    pub speed_multiplier: f32,
    pub speed_min: f32,
    pub speed_max: f32,

    pub lob_speed_multiplier: f32,
    pub lob_y_boost: f32,
    pub lob_z_boost: f32,
    pub lob_gravity_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            movement_epsilon: 0.0001,

            swing_radius: 5.0,
            swing_acceleration_threshold: 5.0,

            acc_max_x: 15.0,
            acc_max_y: 15.0,

            angle_x_min: -0.3,
            angle_x_max: 0.3,
            angle_y_min: 0.25,
            angle_y_max: 1.0,
            angle_z_base: 0.55,

            fallback_angle_y: 0.5,

            speed_multiplier: 1.0,
            speed_min: 12.0,
            speed_max: 25.0,

            lob_speed_multiplier: 1.0,
            lob_y_boost: 1.7,
            lob_z_boost: 0.5,
            lob_gravity_multiplier: 0.8,
        }
    }
}
