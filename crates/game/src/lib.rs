pub mod ability;
pub mod event;
pub mod net;
pub mod phase;
pub mod physics;
pub mod player;
pub mod score;
pub mod simulation;

pub use ability::{AbilityState, AbilityTrigger, AbilityType};
pub use event::{EventQueue, GameEvent, PendingEvent};
pub use net::{
    ClientMessage, Connection, ConnectionError, ConnectionManager, DEFAULT_PORT,
    DEFAULT_TICK_RATE, NetworkEndpoint, NetworkStats, Packet, PacketError, PacketType,
    ServerMessage, SyncTracker,
};
pub use phase::{GamePhase, PhaseMachine, PhaseStep, PhaseTimings};
pub use physics::{Ball, Court};
pub use player::{MAX_PLAYERS, MoveInput, Player, PlayerConfig, PlayerId, ShotType, SwingInput};
pub use score::{GameScore, MatchRules, PointReason, PointScore};
pub use simulation::{FixedTimestep, GameState, MatchSettings, step};
