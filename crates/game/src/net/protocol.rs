pub const MAX_PAYLOAD_SIZE: usize = 256;
pub const FRAME_HEADER_SIZE: usize = 1 + 4;
pub const FRAME_SIZE: usize = FRAME_HEADER_SIZE + MAX_PAYLOAD_SIZE;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TICK_RATE: u32 = 60;
pub const NETWORK_RECEIVE_MAX_ATTEMPTS: u32 = 100;

pub type Frame = [u8; FRAME_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    SetPlayerId = 0,
    PlayerInput = 1,
    PlayerState = 2,
    BallState = 3,
    ScoreUpdate = 4,
    GamePhase = 5,
    PlayerSwing = 6,
    AbilityRequest = 7,
    AbilityState = 8,
    MatchResult = 9,
}

impl PacketType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => PacketType::SetPlayerId,
            1 => PacketType::PlayerInput,
            2 => PacketType::PlayerState,
            3 => PacketType::BallState,
            4 => PacketType::ScoreUpdate,
            5 => PacketType::GamePhase,
            6 => PacketType::PlayerSwing,
            7 => PacketType::AbilityRequest,
            8 => PacketType::AbilityState,
            9 => PacketType::MatchResult,
            _ => return None,
        })
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Exact payload length every packet of this type must declare.
    pub fn payload_size(self) -> usize {
        match self {
            PacketType::SetPlayerId => 4,
            PacketType::PlayerInput => 1,
            PacketType::PlayerState => 48,
            PacketType::BallState => 44,
            PacketType::ScoreUpdate => 60,
            PacketType::GamePhase => 1,
            PacketType::PlayerSwing => 13,
            PacketType::AbilityRequest => 2,
            PacketType::AbilityState => 9,
            PacketType::MatchResult => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketType::SetPlayerId => "SetPlayerId",
            PacketType::PlayerInput => "PlayerInput",
            PacketType::PlayerState => "PlayerState",
            PacketType::BallState => "BallState",
            PacketType::ScoreUpdate => "ScoreUpdate",
            PacketType::GamePhase => "GamePhase",
            PacketType::PlayerSwing => "PlayerSwing",
            PacketType::AbilityRequest => "AbilityRequest",
            PacketType::AbilityState => "AbilityState",
            PacketType::MatchResult => "MatchResult",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    #[error("unknown packet type {0}")]
    UnknownType(u8),
    #[error("declared payload size {0} exceeds {max}", max = MAX_PAYLOAD_SIZE)]
    Oversized(u32),
    #[error("{} payload size mismatch: expected {expected}, got {actual}", .packet_type.as_str())]
    SizeMismatch {
        packet_type: PacketType,
        expected: usize,
        actual: usize,
    },
    #[error("payload truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("invalid {field} value {value}")]
    InvalidValue { field: &'static str, value: i64 },
    #[error("{} is not accepted in this direction", .0.as_str())]
    UnexpectedType(PacketType),
}

/// One protocol message: a type tag and up to [`MAX_PAYLOAD_SIZE`] payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    packet_type: PacketType,
    size: u32,
    payload: [u8; MAX_PAYLOAD_SIZE],
}

impl Packet {
    pub fn new(packet_type: PacketType, data: &[u8]) -> Result<Self, PacketError> {
        if data.len() > MAX_PAYLOAD_SIZE {
            return Err(PacketError::Oversized(data.len() as u32));
        }
        let mut payload = [0u8; MAX_PAYLOAD_SIZE];
        payload[..data.len()].copy_from_slice(data);
        Ok(Self {
            packet_type,
            size: data.len() as u32,
            payload,
        })
    }

    pub(crate) fn from_parts(
        packet_type: PacketType,
        payload: [u8; MAX_PAYLOAD_SIZE],
        size: usize,
    ) -> Self {
        Self {
            packet_type,
            size: size.min(MAX_PAYLOAD_SIZE) as u32,
            payload,
        }
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.size()]
    }

    /// Fails unless the declared size matches what this packet type carries.
    pub fn expect_payload(&self) -> Result<&[u8], PacketError> {
        let expected = self.packet_type.payload_size();
        if self.size() != expected {
            return Err(PacketError::SizeMismatch {
                packet_type: self.packet_type,
                expected,
                actual: self.size(),
            });
        }
        Ok(self.payload())
    }

    pub fn encode(&self) -> Frame {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = self.packet_type.tag();
        frame[1..FRAME_HEADER_SIZE].copy_from_slice(&self.size.to_le_bytes());
        frame[FRAME_HEADER_SIZE..].copy_from_slice(&self.payload);
        frame
    }

    pub fn decode(frame: &Frame) -> Result<Self, PacketError> {
        let packet_type =
            PacketType::from_tag(frame[0]).ok_or(PacketError::UnknownType(frame[0]))?;
        let size = u32::from_le_bytes([frame[1], frame[2], frame[3], frame[4]]);
        if size as usize > MAX_PAYLOAD_SIZE {
            return Err(PacketError::Oversized(size));
        }

        let mut payload = [0u8; MAX_PAYLOAD_SIZE];
        payload.copy_from_slice(&frame[FRAME_HEADER_SIZE..]);
        Ok(Self {
            packet_type,
            size,
            payload,
        })
    }
}
