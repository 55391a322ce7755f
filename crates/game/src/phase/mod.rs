use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum GamePhase {
    #[default]
    WaitForMatch = 0,
    MatchComplete = 1,
    StartGame = 2,
    InRally = 3,
    PointScored = 4,
    GameFinished = 5,
}

impl GamePhase {
    pub const ALL: [GamePhase; 6] = [
        GamePhase::WaitForMatch,
        GamePhase::MatchComplete,
        GamePhase::StartGame,
        GamePhase::InRally,
        GamePhase::PointScored,
        GamePhase::GameFinished,
    ];

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::WaitForMatch => "wait-for-match",
            GamePhase::MatchComplete => "match-complete",
            GamePhase::StartGame => "start-game",
            GamePhase::InRally => "in-rally",
            GamePhase::PointScored => "point-scored",
            GamePhase::GameFinished => "game-finished",
        }
    }

    /// The ball is frozen while waiting for a serve and between points.
    pub fn is_physics_active(self) -> bool {
        !matches!(self, GamePhase::StartGame | GamePhase::PointScored)
    }

    pub fn is_swing_allowed(self) -> bool {
        matches!(self, GamePhase::StartGame | GamePhase::InRally)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub match_complete: f32,
    pub after_point: f32,
    pub game_finished: f32,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            match_complete: 2.0,
            after_point: 3.0,
            game_finished: 1.0,
        }
    }
}

/// Outcome of advancing the phase timer by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    Stay,
    Entered(GamePhase),
    /// The finished match has lingered long enough; the server should stop or reset.
    Terminal,
}

#[derive(Debug, Clone, Default)]
pub struct PhaseMachine {
    phase: GamePhase,
    state_timer: f32,
    timings: PhaseTimings,
}

impl PhaseMachine {
    pub fn new(timings: PhaseTimings) -> Self {
        Self {
            phase: GamePhase::WaitForMatch,
            state_timer: 0.0,
            timings,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    pub fn set_phase(&mut self, next: GamePhase) {
        if next != self.phase {
            log::info!("Phase: {} -> {}", self.phase.as_str(), next.as_str());
        }
        self.phase = next;
        self.state_timer = 0.0;
    }

    /// Accumulates `dt` and applies the timed transition of the current phase, if due.
    /// `match_finished` picks the successor of PointScored.
    pub fn update_phase_timer(&mut self, dt: f32, match_finished: bool) -> PhaseStep {
        self.state_timer += dt;

        let next = match self.phase {
            GamePhase::MatchComplete if self.state_timer > self.timings.match_complete => {
                GamePhase::StartGame
            }
            GamePhase::PointScored if self.state_timer > self.timings.after_point => {
                if match_finished {
                    GamePhase::GameFinished
                } else {
                    GamePhase::StartGame
                }
            }
            GamePhase::GameFinished if self.state_timer > self.timings.game_finished => {
                return PhaseStep::Terminal;
            }
            _ => return PhaseStep::Stay,
        };

        self.set_phase(next);
        PhaseStep::Entered(next)
    }
}
