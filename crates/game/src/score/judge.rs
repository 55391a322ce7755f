use crate::physics::{Ball, Court};
use crate::player::{PlayerId, opponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointReason {
    NetFault,
    Out,
    DoubleBounce,
}

impl PointReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointReason::NetFault => "net",
            PointReason::Out => "out",
            PointReason::DoubleBounce => "double bounce",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointJudgment {
    pub winner: PlayerId,
    pub reason: PointReason,
}

/// Judges the ball right after a ground bounce.
pub fn judge_bounce(ball: &Ball, court: &Court) -> Option<PointJudgment> {
    match ball.bounce_count {
        1 if !court.is_in_court(ball.position) => Some(PointJudgment {
            winner: opponent(ball.last_hit_player_id),
            reason: PointReason::Out,
        }),
        2 => Some(PointJudgment {
            winner: ball.last_hit_player_id,
            reason: PointReason::DoubleBounce,
        }),
        _ => None,
    }
}

/// Net check for the current tick; faults the last hitter.
pub fn judge_net(ball: &Ball, court: &Court) -> Option<PointJudgment> {
    court
        .is_net_fault(ball.previous_z, ball.position)
        .then(|| PointJudgment {
            winner: opponent(ball.last_hit_player_id),
            reason: PointReason::NetFault,
        })
}
