use std::collections::BTreeSet;

use crate::event::PendingEvent;
use crate::phase::GamePhase;
use crate::simulation::GameState;

use super::message::{PlayerSnapshot, ScoreSnapshot, ServerMessage};

/// Remembers what the clients were last told so that score and phase are only resent on
/// change and the match result goes out exactly once.
#[derive(Debug, Clone, Default)]
pub struct SyncTracker {
    last_score: Option<ScoreSnapshot>,
    last_phase: Option<GamePhase>,
    match_result_sent: bool,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn match_result_sent(&self) -> bool {
        self.match_result_sent
    }

    /// Messages to broadcast after a tick, given the events raised during it.
    pub fn outgoing(&mut self, state: &GameState, events: &[PendingEvent]) -> Vec<ServerMessage> {
        let mut out = Vec::new();

        let moved: BTreeSet<_> = events.iter().filter_map(|p| p.event.moved_player()).collect();
        for id in moved {
            if let Some(player) = state.player(id) {
                out.push(ServerMessage::PlayerState(PlayerSnapshot::from(player)));
            }
        }

        let abilities: BTreeSet<_> = events
            .iter()
            .filter_map(|p| p.event.ability_player())
            .collect();
        for id in abilities {
            if let Some(ability) = state.abilities.get(id) {
                out.push(ServerMessage::AbilityState(*ability));
            }
        }

        let score = ScoreSnapshot::from(&state.score);
        if self.last_score != Some(score) {
            self.last_score = Some(score);
            out.push(ServerMessage::ScoreUpdate(score));
        }

        let phase = state.phase();
        if self.last_phase != Some(phase) {
            self.last_phase = Some(phase);
            out.push(ServerMessage::GamePhase(phase));
        }

        out.push(ServerMessage::BallState(state.ball.clone()));

        if phase == GamePhase::GameFinished && !self.match_result_sent {
            if let Some(winner) = state.score.winner() {
                self.match_result_sent = true;
                out.push(ServerMessage::MatchResult { winner });
            }
        }

        out
    }

    /// Complete picture for a client joining an existing session. Does not touch the
    /// change tracking of the other clients.
    pub fn full_state(state: &GameState) -> Vec<ServerMessage> {
        let mut out: Vec<ServerMessage> = state
            .players
            .iter()
            .filter(|p| p.connected)
            .map(|p| ServerMessage::PlayerState(PlayerSnapshot::from(p)))
            .collect();

        out.extend(
            state
                .abilities
                .iter()
                .filter(|a| a.remaining_frames > 0)
                .map(|a| ServerMessage::AbilityState(*a)),
        );
        out.push(ServerMessage::ScoreUpdate(ScoreSnapshot::from(&state.score)));
        out.push(ServerMessage::GamePhase(state.phase()));
        out.push(ServerMessage::BallState(state.ball.clone()));
        out
    }
}
