mod judge;
mod tracker;

pub use judge::{PointJudgment, PointReason, judge_bounce, judge_net};
pub use tracker::{
    DEFAULT_GAMES_TO_WIN_SET, DEFAULT_SETS_TO_WIN, GameScore, MAX_SETS, MAX_SETS_TO_WIN,
    MatchRules, PointScore, RulesError,
};
