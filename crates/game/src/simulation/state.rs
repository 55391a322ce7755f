use serde::{Deserialize, Serialize};

use crate::ability::AbilityState;
use crate::event::{EventQueue, GameEvent, PendingEvent};
use crate::phase::{GamePhase, PhaseMachine, PhaseTimings};
use crate::physics::{Ball, Court};
use crate::player::{MAX_PLAYERS, Player, PlayerConfig, PlayerController, PlayerId};
use crate::score::{GameScore, MatchRules};

/// Everything that parameterises one match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSettings {
    pub rules: MatchRules,
    pub court: Court,
    pub player: PlayerConfig,
    pub timings: PhaseTimings,
}

/// The single authoritative world. Owned by the server loop; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct GameState {
    pub ball: Ball,
    pub players: [Player; MAX_PLAYERS],
    pub score: GameScore,
    pub abilities: [AbilityState; MAX_PLAYERS],
    pub server_player_id: PlayerId,
    court: Court,
    phase: PhaseMachine,
    controller: PlayerController,
    settings: MatchSettings,
    events: EventQueue,
    tick: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MatchSettings::default())
    }
}

impl GameState {
    pub fn new(settings: MatchSettings) -> Self {
        let speed = settings.player.move_speed;
        let mut ball = Ball::new();
        ball.reset_for_serve(0);

        Self {
            ball,
            players: std::array::from_fn(|id| Player::new(id, speed)),
            score: GameScore::new(settings.rules),
            abilities: std::array::from_fn(AbilityState::new),
            server_player_id: 0,
            court: settings.court,
            phase: PhaseMachine::new(settings.timings),
            controller: PlayerController::new(settings.player.clone()),
            settings,
            events: EventQueue::default(),
            tick: 0,
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    pub fn state_timer(&self) -> f32 {
        self.phase.state_timer()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn phase_machine_mut(&mut self) -> &mut PhaseMachine {
        &mut self.phase
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn set_phase(&mut self, next: GamePhase) {
        let from = self.phase.phase();
        self.phase.set_phase(next);
        self.push_event(GameEvent::PhaseChanged { from, to: next });
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        let player = self.players.get_mut(id);
        if player.is_none() {
            log::warn!("Ignoring invalid player id {}", id);
        }
        player
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.connected).count()
    }

    pub fn set_connected(&mut self, id: PlayerId, connected: bool) {
        if let Some(player) = self.player_mut(id) {
            player.connected = connected;
        }
    }

    /// Both seats are filled: start the countdown to the first serve.
    pub fn begin_match(&mut self) {
        if self.phase() != GamePhase::WaitForMatch {
            return;
        }
        log::info!("Both players connected, match starting");
        self.set_phase(GamePhase::MatchComplete);
    }

    /// Wipes the match back to the waiting room, keeping settings.
    pub fn reset_for_new_match(&mut self) {
        log::info!("Resetting game state for a new match");
        *self = Self::new(self.settings.clone());
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(self.tick, event);
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<PendingEvent> {
        self.events.drain()
    }
}
