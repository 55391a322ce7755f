use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rally::net::PlayerSnapshot;
use rally::{
    ClientMessage, ConnectionError, ConnectionManager, FixedTimestep, GameEvent, GamePhase,
    GameState, NetworkEndpoint, NetworkStats, Packet, PhaseStep, PlayerId, ServerMessage,
    SyncTracker, simulation,
};

use crate::config::ServerConfig;
use crate::events::{DisconnectReason, ServerEvent};

pub struct GameServer {
    endpoint: NetworkEndpoint,
    connections: ConnectionManager,
    config: ServerConfig,
    state: GameState,
    sync: SyncTracker,
    timestep: FixedTimestep,
    last_tick_time: Instant,
    running: Arc<AtomicBool>,
    matches_played: u32,
    pending_events: VecDeque<ServerEvent>,
}

impl GameServer {
    pub fn new(bind_addr: &str, config: ServerConfig) -> io::Result<Self> {
        let endpoint = NetworkEndpoint::bind(bind_addr)?;

        Ok(Self {
            endpoint,
            connections: ConnectionManager::new(),
            state: GameState::new(config.match_settings.clone()),
            sync: SyncTracker::new(),
            timestep: FixedTimestep::new(config.tick_rate),
            last_tick_time: Instant::now(),
            running: Arc::new(AtomicBool::new(true)),
            matches_played: 0,
            pending_events: VecDeque::new(),
            config,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ServerEvent> + '_ {
        self.pending_events.drain(..)
    }

    /// How long the caller may sleep before the next tick is due.
    pub fn time_to_next_tick(&self) -> Duration {
        Duration::from_secs_f32(self.timestep.remaining())
    }

    pub fn tick_once(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_tick_time;
        self.last_tick_time = now;
        self.timestep.accumulate(delta.as_secs_f32());

        if let Err(e) = self.accept_clients() {
            self.pending_events.push_back(ServerEvent::Error {
                message: format!("Accept failed: {}", e),
            });
        }

        while self.timestep.consume_tick() {
            if !self.tick() {
                break;
            }
        }
    }

    /// One fixed step. Returns false once the server has stopped or reset.
    fn tick(&mut self) -> bool {
        let dt = self.timestep.dt();

        self.process_network(dt);
        let outcome = simulation::step(&mut self.state, dt);
        self.broadcast_tick();

        match outcome {
            PhaseStep::Terminal => {
                self.finish_match();
                false
            }
            _ => true,
        }
    }

    fn accept_clients(&mut self) -> io::Result<()> {
        for (stream, addr) in self.endpoint.accept_pending()? {
            let Some(player_id) = self.connections.attach(stream, addr)? else {
                self.pending_events
                    .push_back(ServerEvent::ConnectionDenied { addr });
                continue;
            };

            self.state.set_connected(player_id, true);
            self.pending_events
                .push_back(ServerEvent::ClientConnected { player_id, addr });

            self.send_to(player_id, &ServerMessage::SetPlayerId(player_id));

            if self.state.phase() == GamePhase::WaitForMatch {
                if self.connections.connected_count() == rally::MAX_PLAYERS {
                    self.start_match();
                }
            } else {
                self.rejoin(player_id);
            }
        }
        Ok(())
    }

    fn start_match(&mut self) {
        self.state.begin_match();

        let players: Vec<_> = self
            .state
            .players
            .iter()
            .filter(|p| p.connected)
            .map(|p| ServerMessage::PlayerState(PlayerSnapshot::from(p)))
            .collect();
        for message in players {
            self.broadcast(&message);
        }
    }

    /// A client took a slot freed during a running match: catch it up, then tell everyone
    /// where the returning player stands.
    fn rejoin(&mut self, player_id: PlayerId) {
        log::info!("Player {} rejoined the running match", player_id);
        for message in SyncTracker::full_state(&self.state) {
            self.send_to(player_id, &message);
        }
        if let Some(player) = self.state.player(player_id) {
            let message = ServerMessage::PlayerState(PlayerSnapshot::from(player));
            self.broadcast(&message);
        }
    }

    fn process_network(&mut self, dt: f32) {
        for player_id in self.connections.connected_ids() {
            let Some(conn) = self.connections.get_mut(player_id) else {
                continue;
            };

            let frame = match conn.poll_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    let reason = match e {
                        ConnectionError::Closed => DisconnectReason::Graceful,
                        _ => DisconnectReason::ReadFailed,
                    };
                    log::debug!("Player {} read error: {}", player_id, e);
                    self.drop_client(player_id, reason);
                    continue;
                }
            };

            let message =
                Packet::decode(&frame).and_then(|packet| ClientMessage::from_packet(&packet));
            match message {
                Ok(message) => {
                    simulation::apply_client_message(&mut self.state, player_id, &message, dt);
                }
                Err(e) => {
                    conn.record_dropped();
                    self.pending_events.push_back(ServerEvent::PacketDropped {
                        player_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    fn broadcast_tick(&mut self) {
        let events = self.state.drain_events();

        for pending in &events {
            if let GameEvent::MatchFinished { winner } = pending.event {
                self.pending_events
                    .push_back(ServerEvent::MatchEnded { winner });
            }
        }

        for message in self.sync.outgoing(&self.state, &events) {
            self.broadcast(&message);
        }
    }

    fn finish_match(&mut self) {
        self.matches_played += 1;

        if self.config.rematch {
            log::info!("Match over, waiting for a new pair of players");
            self.shutdown_connections();
            self.state.reset_for_new_match();
            self.sync.reset();
            self.timestep.reset();
        } else {
            log::info!("Match over, shutting down");
            self.running.store(false, Ordering::SeqCst);
        }
    }

    fn send_to(&mut self, player_id: PlayerId, message: &ServerMessage) {
        if let Err(e) = self.connections.send_to(player_id, &message.to_packet()) {
            log::warn!("Send to player {} failed: {}", player_id, e);
            self.drop_client(player_id, DisconnectReason::WriteFailed);
        }
    }

    fn broadcast(&mut self, message: &ServerMessage) {
        let failed = self.connections.broadcast(&message.to_packet());
        for (player_id, e) in failed {
            log::warn!("Send to player {} failed: {}", player_id, e);
            self.drop_client(player_id, DisconnectReason::WriteFailed);
        }
    }

    fn drop_client(&mut self, player_id: PlayerId, reason: DisconnectReason) {
        if self.connections.disconnect(player_id).is_none() {
            return;
        }
        self.state.set_connected(player_id, false);
        self.pending_events
            .push_back(ServerEvent::ClientDisconnected { player_id, reason });
    }

    pub fn shutdown_connections(&mut self) {
        for player_id in self.connections.connected_ids() {
            self.drop_client(player_id, DisconnectReason::Shutdown);
        }
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            tick: self.state.tick(),
            client_count: self.connections.connected_count(),
            phase: self.state.phase(),
            matches_played: self.matches_played,
            network_stats: self.connections.stats(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerStats {
    pub tick: u64,
    pub client_count: usize,
    pub phase: GamePhase,
    pub matches_played: u32,
    pub network_stats: NetworkStats,
}
