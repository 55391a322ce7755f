mod connection;
mod endpoint;
mod message;
mod protocol;
mod stats;
mod sync;

pub use connection::{Connection, ConnectionError, ConnectionManager};
pub use endpoint::NetworkEndpoint;
pub use message::{
    ClientMessage, MAX_WIRE_SETS, PlayerSnapshot, ScoreSnapshot, ServerMessage, WireReader,
    WireWriter,
};
pub use protocol::{
    DEFAULT_PORT, DEFAULT_TICK_RATE, FRAME_HEADER_SIZE, FRAME_SIZE, Frame, MAX_PAYLOAD_SIZE,
    NETWORK_RECEIVE_MAX_ATTEMPTS, Packet, PacketError, PacketType,
};
pub use stats::NetworkStats;
pub use sync::SyncTracker;
