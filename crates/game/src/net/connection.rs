use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use crate::player::{MAX_PLAYERS, PlayerId};

use super::protocol::{FRAME_SIZE, Frame, NETWORK_RECEIVE_MAX_ATTEMPTS, Packet};
use super::stats::NetworkStats;

const RETRY_BACKOFF: Duration = Duration::from_micros(200);

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("connection closed by peer")]
    Closed,
    #[error("frame incomplete after {0} attempts")]
    RetryBudgetExhausted(u32),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// One connected client, bound to a player slot for its lifetime.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    player_id: PlayerId,
    stats: NetworkStats,
}

impl Connection {
    pub fn new(stream: TcpStream, addr: SocketAddr, player_id: PlayerId) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            addr,
            player_id,
            stats: NetworkStats::default(),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn record_dropped(&mut self) {
        self.stats.record_dropped();
    }

    /// Reads one whole frame if the client has sent anything. A frame that starts arriving
    /// must complete within the retry budget.
    pub fn poll_frame(&mut self) -> Result<Option<Frame>, ConnectionError> {
        let mut frame = [0u8; FRAME_SIZE];
        let mut filled = 0;
        let mut attempts = 0;

        while filled < FRAME_SIZE {
            match self.stream.read(&mut frame[filled..]) {
                Ok(0) => return Err(ConnectionError::Closed),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if filled == 0 {
                        return Ok(None);
                    }
                    attempts += 1;
                    if attempts >= NETWORK_RECEIVE_MAX_ATTEMPTS {
                        return Err(ConnectionError::RetryBudgetExhausted(attempts));
                    }
                    thread::sleep(RETRY_BACKOFF);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.stats.record_received(FRAME_SIZE);
        Ok(Some(frame))
    }

    pub fn send(&mut self, packet: &Packet) -> Result<(), ConnectionError> {
        let frame = packet.encode();
        let mut written = 0;
        let mut attempts = 0;

        while written < FRAME_SIZE {
            match self.stream.write(&frame[written..]) {
                Ok(0) => return Err(ConnectionError::Closed),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    attempts += 1;
                    if attempts >= NETWORK_RECEIVE_MAX_ATTEMPTS {
                        return Err(ConnectionError::RetryBudgetExhausted(attempts));
                    }
                    thread::sleep(RETRY_BACKOFF);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.stats.record_sent(FRAME_SIZE);
        Ok(())
    }

    pub fn close(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Fixed player slots. A slot is freed independently when its client goes away.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    slots: [Option<Connection>; MAX_PLAYERS],
    closed_stats: NetworkStats,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_slot(&self) -> Option<PlayerId> {
        self.slots.iter().position(Option::is_none)
    }

    /// Seats `stream` in the first free slot. A client arriving while both slots are taken
    /// is closed immediately and `None` is returned.
    pub fn attach(&mut self, stream: TcpStream, addr: SocketAddr) -> io::Result<Option<PlayerId>> {
        let Some(player_id) = self.free_slot() else {
            let _ = stream.shutdown(Shutdown::Both);
            return Ok(None);
        };
        self.slots[player_id] = Some(Connection::new(stream, addr, player_id)?);
        Ok(Some(player_id))
    }

    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut Connection> {
        self.slots.get_mut(player_id).and_then(Option::as_mut)
    }

    pub fn is_connected(&self, player_id: PlayerId) -> bool {
        self.slots.get(player_id).is_some_and(Option::is_some)
    }

    pub fn connected_ids(&self) -> Vec<PlayerId> {
        (0..MAX_PLAYERS).filter(|&id| self.is_connected(id)).collect()
    }

    pub fn connected_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn disconnect(&mut self, player_id: PlayerId) -> Option<Connection> {
        let conn = self.slots.get_mut(player_id)?.take()?;
        conn.close();
        self.closed_stats.merge(conn.stats());
        Some(conn)
    }

    pub fn send_to(&mut self, player_id: PlayerId, packet: &Packet) -> Result<(), ConnectionError> {
        match self.get_mut(player_id) {
            Some(conn) => conn.send(packet),
            None => Ok(()),
        }
    }

    /// Sends to every connected slot and returns the slots whose send failed.
    pub fn broadcast(&mut self, packet: &Packet) -> Vec<(PlayerId, ConnectionError)> {
        let mut failed = Vec::new();
        for conn in self.slots.iter_mut().flatten() {
            if let Err(e) = conn.send(packet) {
                failed.push((conn.player_id(), e));
            }
        }
        failed
    }

    pub fn close_all(&mut self) {
        for id in 0..MAX_PLAYERS {
            self.disconnect(id);
        }
    }

    /// Totals across live and already closed connections.
    pub fn stats(&self) -> NetworkStats {
        let mut total = self.closed_stats;
        for conn in self.slots.iter().flatten() {
            total.merge(conn.stats());
        }
        total
    }
}
