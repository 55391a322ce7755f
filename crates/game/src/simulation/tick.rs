use crate::ability::tick_abilities;
use crate::event::GameEvent;
use crate::phase::{GamePhase, PhaseStep};
use crate::physics::{BOUNCE_RESTITUTION, GROUND_Y};
use crate::player::opponent;
use crate::score::{PointJudgment, judge_bounce, judge_net};

use super::GameState;

pub struct FixedTimestep {
    tick_rate: u32,
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.min(0.25);
    }

    pub fn should_tick(&self) -> bool {
        self.accumulator >= self.dt
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

    /// Time left until the next tick is due, in seconds.
    pub fn remaining(&self) -> f32 {
        (self.dt - self.accumulator).max(0.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Advances the match by one fixed step: physics, net and bounce judging, scoring, phase
/// timers and ability expiry. Inputs for this tick must already be applied.
pub fn step(state: &mut GameState, dt: f32) -> PhaseStep {
    let physics_active = state.phase().is_physics_active();
    if physics_active {
        state.ball.integrate(dt);
    }

    let net_fault = if state.phase() == GamePhase::InRally {
        judge_net(&state.ball, state.court())
    } else {
        None
    };

    if let Some(judgment) = net_fault {
        award_point(state, judgment);
    } else if physics_active && state.ball.bounce(GROUND_Y, BOUNCE_RESTITUTION) {
        state.ball.bounce_count += 1;
        if state.phase() == GamePhase::InRally {
            if let Some(judgment) = judge_bounce(&state.ball, state.court()) {
                award_point(state, judgment);
            }
        }
    }

    let phase_step = advance_phase(state, dt);

    for player_id in tick_abilities(&mut state.abilities) {
        log::debug!("Player {} ability expired", player_id);
        state.push_event(GameEvent::AbilityExpired { player_id });
    }

    state.advance_tick();
    phase_step
}

fn award_point(state: &mut GameState, judgment: PointJudgment) {
    let PointJudgment { winner, reason } = judgment;
    log::info!("Point to player {} ({})", winner, reason.as_str());

    state.score.add_point(winner);
    log::info!("Score: {}", state.score.summary());

    state.server_player_id = opponent(winner);
    state.ball.hit_count = 0;
    state.push_event(GameEvent::PointScored { winner, reason });
    state.set_phase(GamePhase::PointScored);
}

fn advance_phase(state: &mut GameState, dt: f32) -> PhaseStep {
    let from = state.phase();
    let match_finished = state.score.is_match_finished();
    let step = state.phase_machine_mut().update_phase_timer(dt, match_finished);

    if let PhaseStep::Entered(to) = step {
        state.push_event(GameEvent::PhaseChanged { from, to });
        match to {
            GamePhase::StartGame => {
                let server = state.server_player_id;
                log::info!("Next serve: player {}", server);
                state.ball.reset_for_serve(server);
            }
            GamePhase::GameFinished => {
                if let Some(winner) = state.score.winner() {
                    state.push_event(GameEvent::MatchFinished { winner });
                }
            }
            _ => {}
        }
    }

    step
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::ability::{AbilityTrigger, AbilityType};
    use crate::physics::{NET_HEIGHT, SERVE_POSITION_Z};
    use crate::score::{MatchRules, PointReason, PointScore};
    use crate::simulation::{MatchSettings, apply_ability_request};

    const DT: f32 = 1.0 / 60.0;

    fn rally_state() -> GameState {
        let mut state = GameState::default();
        state.set_phase(GamePhase::InRally);
        state.drain_events();
        state
    }

    #[test]
    fn fixed_timestep_accumulation() {
        let mut ts = FixedTimestep::new(60);

        ts.accumulate(1.0 / 30.0);
        assert!(ts.should_tick());
        assert!(ts.consume_tick());
        assert!(ts.consume_tick());
        assert!(!ts.consume_tick());
        assert!(ts.remaining() > 0.0);
    }

    #[test]
    fn ball_frozen_while_waiting_to_serve() {
        let mut state = GameState::default();
        state.set_phase(GamePhase::StartGame);
        let before = state.ball.clone();
        for _ in 0..30 {
            step(&mut state, DT);
        }
        assert_eq!(state.ball, before);
    }

    #[test]
    fn net_fault_beats_bounce_out() {
        let mut state = rally_state();
        state.ball.last_hit_player_id = 0;
        state.ball.bounce_count = 0;
        state.ball.position = Vec3::new(5.0, 0.01, 0.05);
        state.ball.velocity = Vec3::new(0.0, -3.0, -6.0);

        step(&mut state, DT);

        assert!(state.ball.position.y <= NET_HEIGHT);
        assert_eq!(state.score.point(1), PointScore::Fifteen);
        assert_eq!(state.score.point(0), PointScore::Love);
        assert_eq!(state.ball.bounce_count, 0);
        assert_eq!(state.phase(), GamePhase::PointScored);
        assert!(state.events().any(|e| matches!(
            e,
            GameEvent::PointScored { winner: 1, reason: PointReason::NetFault }
        )));
    }

    #[test]
    fn out_on_first_bounce() {
        let mut state = rally_state();
        state.ball.last_hit_player_id = 1;
        state.ball.position = Vec3::new(6.0, 0.02, 8.0);
        state.ball.previous_z = 8.0;
        state.ball.velocity = Vec3::new(0.0, -4.0, 1.0);

        step(&mut state, DT);

        assert_eq!(state.ball.bounce_count, 1);
        assert_eq!(state.score.point(0), PointScore::Fifteen);
        assert_eq!(state.server_player_id, 1);
    }

    #[test]
    fn first_bounce_in_keeps_rally_alive() {
        let mut state = rally_state();
        state.ball.last_hit_player_id = 1;
        state.ball.position = Vec3::new(1.0, 0.02, 6.0);
        state.ball.velocity = Vec3::new(0.0, -4.0, 3.0);

        step(&mut state, DT);

        assert_eq!(state.ball.bounce_count, 1);
        assert_eq!(state.phase(), GamePhase::InRally);
        assert_eq!(state.score.points(), [PointScore::Love; 2]);
    }

    #[test]
    fn after_point_delay_resets_ball_for_receiver() {
        let mut state = rally_state();
        state.ball.last_hit_player_id = 0;
        state.ball.bounce_count = 1;
        state.ball.hit_count = 4;
        state.ball.position = Vec3::new(0.0, 0.01, -5.0);
        state.ball.velocity = Vec3::new(0.0, -2.0, -1.0);

        step(&mut state, DT);
        assert_eq!(state.score.point(0), PointScore::Fifteen);
        assert_eq!(state.ball.hit_count, 0);
        assert_eq!(state.server_player_id, 1);

        while state.phase() == GamePhase::PointScored {
            step(&mut state, DT);
        }
        assert_eq!(state.phase(), GamePhase::StartGame);
        assert_eq!(state.ball.position, Vec3::new(0.0, 1.0, -SERVE_POSITION_Z));
        assert_eq!(state.ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn sprint_expires_after_its_duration() {
        let mut state = GameState::default();
        apply_ability_request(&mut state, 0, AbilityType::Sprint, AbilityTrigger::Press);
        state.drain_events();

        for _ in 0..180 {
            step(&mut state, DT);
        }
        assert!(state.events().any(|e| *e == GameEvent::AbilityExpired { player_id: 0 }));
        assert_eq!(state.abilities[0].remaining_frames, 0);
    }

    #[test]
    fn finished_match_reports_winner_then_terminates() {
        let mut state = GameState::new(MatchSettings {
            rules: MatchRules {
                games_to_win_set: 1,
                sets_to_win: 1,
            },
            ..Default::default()
        });
        for _ in 0..3 {
            state.score.add_point(1);
        }
        state.set_phase(GamePhase::InRally);
        state.ball.last_hit_player_id = 1;
        state.ball.bounce_count = 1;
        state.ball.position = Vec3::new(0.0, 0.01, 5.0);
        state.ball.velocity = Vec3::new(0.0, -2.0, 0.0);
        step(&mut state, DT);
        assert!(state.score.is_match_finished());

        let mut terminal = false;
        for _ in 0..400 {
            if step(&mut state, DT) == PhaseStep::Terminal {
                terminal = true;
                break;
            }
        }
        assert!(terminal);
        assert_eq!(state.phase(), GamePhase::GameFinished);
        assert!(state.events().any(|e| *e == GameEvent::MatchFinished { winner: 1 }));
    }
}
