use std::net::SocketAddr;

use rally::PlayerId;

#[derive(Debug, Clone)]
pub enum ServerEvent {
    ClientConnected {
        player_id: PlayerId,
        addr: SocketAddr,
    },
    ClientDisconnected {
        player_id: PlayerId,
        reason: DisconnectReason,
    },
    ConnectionDenied {
        addr: SocketAddr,
    },
    PacketDropped {
        player_id: PlayerId,
        reason: String,
    },
    MatchEnded {
        winner: PlayerId,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    Graceful,
    ReadFailed,
    WriteFailed,
    Shutdown,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectReason::Graceful => "disconnected",
            DisconnectReason::ReadFailed => "dropped (read failed)",
            DisconnectReason::WriteFailed => "dropped (write failed)",
            DisconnectReason::Shutdown => "closed by server",
        }
    }
}
