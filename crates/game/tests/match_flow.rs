use glam::Vec3;

use rally::net::PlayerSnapshot;
use rally::physics::SERVE_POSITION_Z;
use rally::score::PointReason;
use rally::{
    Ball, GameEvent, GamePhase, GameState, MatchRules, MatchSettings, PhaseStep, PlayerId,
    PointScore, ServerMessage, ShotType, SwingInput, SyncTracker, simulation,
};

const DT: f32 = 1.0 / 60.0;
const MAX_TICKS: usize = 60 * 30;

fn run_until(state: &mut GameState, phase: GamePhase) {
    for _ in 0..MAX_TICKS {
        if state.phase() == phase {
            return;
        }
        simulation::step(state, DT);
    }
    panic!("never reached {:?}, stuck in {:?}", phase, state.phase());
}

fn started_match(settings: MatchSettings) -> GameState {
    let mut state = GameState::new(settings);
    state.set_connected(0, true);
    state.set_connected(1, true);
    state.begin_match();
    run_until(&mut state, GamePhase::StartGame);
    state
}

fn serve(state: &mut GameState) {
    let server = state.server_player_id;
    state.players[server].position = Vec3::new(0.0, 0.0, state.ball.position.z);
    let swing = SwingInput {
        acceleration: Vec3::new(0.0, 12.0, 8.0),
        shot: ShotType::Normal,
    };
    assert!(simulation::apply_swing(state, server, &swing));
    assert_eq!(state.phase(), GamePhase::InRally);
}

/// Leaves the ball as if `hitter` had just dropped it short on the opponent's side.
fn drop_shot_by(state: &mut GameState, hitter: PlayerId) {
    let side = if hitter == 0 { -1.0 } else { 1.0 };
    state.ball.position = Vec3::new(0.0, 0.5, side * 4.0);
    state.ball.previous_z = side * 4.0;
    state.ball.velocity = Vec3::ZERO;
    state.ball.bounce_count = 0;
    state.ball.last_hit_player_id = hitter;
}

#[test]
fn test_double_bounce_scores_and_resets_serve() {
    let mut state = started_match(MatchSettings::default());
    assert_eq!(state.ball.position, Ball::serve_position(0));

    serve(&mut state);
    drop_shot_by(&mut state, 1);
    run_until(&mut state, GamePhase::PointScored);

    assert_eq!(state.score.point(1), PointScore::Fifteen);
    assert_eq!(state.score.point(0), PointScore::Love);
    assert_eq!(state.server_player_id, 0);
    assert!(state.events().any(|e| *e
        == GameEvent::PointScored {
            winner: 1,
            reason: PointReason::DoubleBounce
        }));

    run_until(&mut state, GamePhase::StartGame);
    assert_eq!(state.ball.position.z, SERVE_POSITION_Z);
    assert_eq!(state.ball.velocity, Vec3::ZERO);
    assert_eq!(state.ball.bounce_count, 0);
    assert_eq!(state.ball.hit_count, 0);
}

#[test]
fn test_frozen_ball_between_points() {
    let mut state = started_match(MatchSettings::default());
    let resting = state.ball.position;

    for _ in 0..120 {
        simulation::step(&mut state, DT);
    }
    assert_eq!(state.phase(), GamePhase::StartGame);
    assert_eq!(state.ball.position, resting);
}

#[test]
fn test_short_match_runs_to_completion() {
    let settings = MatchSettings {
        rules: MatchRules {
            games_to_win_set: 1,
            sets_to_win: 1,
        },
        ..Default::default()
    };
    let mut state = started_match(settings);
    let mut tracker = SyncTracker::new();
    let events = state.drain_events();
    tracker.outgoing(&state, &events);

    for _ in 0..4 {
        run_until(&mut state, GamePhase::StartGame);
        serve(&mut state);
        drop_shot_by(&mut state, 0);
        run_until(&mut state, GamePhase::PointScored);
    }
    assert!(state.score.is_match_finished());
    assert_eq!(state.score.winner(), Some(0));

    run_until(&mut state, GamePhase::GameFinished);
    let events = state.drain_events();
    assert!(
        events
            .iter()
            .any(|p| p.event == GameEvent::MatchFinished { winner: 0 })
    );

    let out = tracker.outgoing(&state, &events);
    assert!(out.contains(&ServerMessage::MatchResult { winner: 0 }));
    assert!(out.contains(&ServerMessage::GamePhase(GamePhase::GameFinished)));

    let mut terminal = false;
    for _ in 0..MAX_TICKS {
        if simulation::step(&mut state, DT) == PhaseStep::Terminal {
            terminal = true;
            break;
        }
    }
    assert!(terminal);

    let events = state.drain_events();
    let again = tracker.outgoing(&state, &events);
    assert!(!again.contains(&ServerMessage::MatchResult { winner: 0 }));

    state.reset_for_new_match();
    assert_eq!(state.phase(), GamePhase::WaitForMatch);
    assert_eq!(state.score.winner(), None);
    assert_eq!(state.ball.position, Ball::serve_position(0));
}

#[test]
fn test_rejoining_player_gets_full_picture() {
    let mut state = started_match(MatchSettings::default());
    serve(&mut state);
    drop_shot_by(&mut state, 0);
    run_until(&mut state, GamePhase::PointScored);

    state.set_connected(1, false);
    state.set_connected(1, true);

    let out = SyncTracker::full_state(&state);
    assert!(out.contains(&ServerMessage::PlayerState(PlayerSnapshot::from(&state.players[0]))));
    assert!(out.contains(&ServerMessage::PlayerState(PlayerSnapshot::from(&state.players[1]))));
    assert!(out.contains(&ServerMessage::GamePhase(GamePhase::PointScored)));
    assert!(out.iter().any(|m| matches!(m, ServerMessage::ScoreUpdate(s) if s.points[0] == 15)));
}
