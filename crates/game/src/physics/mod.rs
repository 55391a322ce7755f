mod ball;
mod court;
pub mod vector;

pub use ball::{
    BALL_SERVE_HEIGHT, BALL_SERVE_OFFSET, BOUNCE_RESTITUTION, Ball, GRAVITY, GROUND_Y,
    PLAYER_BASELINE_DISTANCE, SERVE_POSITION_Z,
};
pub use court::{
    COURT_HALF_LENGTH, COURT_HALF_WIDTH, COURT_MAX_HEIGHT, Court, NET_HEIGHT, NET_POSITION_Z,
};
