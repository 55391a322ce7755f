use glam::Vec3;

use crate::ability::{AbilityState, AbilityTrigger, AbilityType};
use crate::phase::GamePhase;
use crate::physics::Ball;
use crate::player::{
    MAX_PLAYERS, MoveInput, PLAYER_NAME_LEN, Player, PlayerId, ShotType, SwingInput,
};
use crate::score::{GameScore, MAX_SETS};

use super::protocol::{MAX_PAYLOAD_SIZE, Packet, PacketError, PacketType};

/// Set slots carried by a ScoreUpdate. `MatchRules` never allows a longer match.
pub const MAX_WIRE_SETS: usize = MAX_SETS;

/// Little-endian payload builder.
pub struct WireWriter {
    packet_type: PacketType,
    buf: [u8; MAX_PAYLOAD_SIZE],
    len: usize,
}

impl WireWriter {
    pub fn new(packet_type: PacketType) -> Self {
        Self {
            packet_type,
            buf: [0u8; MAX_PAYLOAD_SIZE],
            len: 0,
        }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let n = bytes.len().min(MAX_PAYLOAD_SIZE - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        self
    }

    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.put_bytes(&[v])
    }

    pub fn put_i32(&mut self, v: i32) -> &mut Self {
        self.put_bytes(&v.to_le_bytes())
    }

    pub fn put_f32(&mut self, v: f32) -> &mut Self {
        self.put_bytes(&v.to_le_bytes())
    }

    pub fn put_vec3(&mut self, v: Vec3) -> &mut Self {
        self.put_f32(v.x).put_f32(v.y).put_f32(v.z)
    }

    pub fn put_count(&mut self, v: u32) -> &mut Self {
        self.put_i32(i32::try_from(v).unwrap_or(i32::MAX))
    }

    pub fn put_id(&mut self, id: PlayerId) -> &mut Self {
        self.put_i32(i32::try_from(id).unwrap_or(-1))
    }

    /// Fixed-width NUL-padded string; always leaves room for a terminator.
    pub fn put_name(&mut self, name: &str) -> &mut Self {
        let mut field = [0u8; PLAYER_NAME_LEN];
        let bytes = name.as_bytes();
        let n = bytes.len().min(PLAYER_NAME_LEN - 1);
        field[..n].copy_from_slice(&bytes[..n]);
        self.put_bytes(&field)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finish(&self) -> Packet {
        Packet::from_parts(self.packet_type, self.buf, self.len)
    }
}

/// Little-endian payload cursor. Every read is bounds-checked.
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], PacketError> {
        let available = self.data.len() - self.pos;
        if available < N {
            return Err(PacketError::Truncated {
                needed: N,
                available,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, PacketError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn i32(&mut self) -> Result<i32, PacketError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub fn f32(&mut self) -> Result<f32, PacketError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    pub fn vec3(&mut self) -> Result<Vec3, PacketError> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    pub fn count(&mut self, field: &'static str) -> Result<u32, PacketError> {
        let v = self.i32()?;
        u32::try_from(v).map_err(|_| PacketError::InvalidValue {
            field,
            value: v as i64,
        })
    }

    pub fn player_id(&mut self) -> Result<PlayerId, PacketError> {
        let v = self.i32()?;
        match usize::try_from(v) {
            Ok(id) if id < MAX_PLAYERS => Ok(id),
            _ => Err(PacketError::InvalidValue {
                field: "player id",
                value: v as i64,
            }),
        }
    }

    pub fn name(&mut self) -> Result<String, PacketError> {
        let field = self.take::<PLAYER_NAME_LEN>()?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(PLAYER_NAME_LEN);
        Ok(String::from_utf8_lossy(&field[..end]).into_owned())
    }
}

fn invalid(field: &'static str, tag: u8) -> PacketError {
    PacketError::InvalidValue {
        field,
        value: tag as i64,
    }
}

/// Intent sent by a client. The server never trusts anything else from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientMessage {
    Input(MoveInput),
    Swing(SwingInput),
    AbilityRequest {
        ability: AbilityType,
        trigger: AbilityTrigger,
    },
}

impl ClientMessage {
    pub fn to_packet(&self) -> Packet {
        match self {
            ClientMessage::Input(input) => {
                WireWriter::new(PacketType::PlayerInput).put_u8(input.bits()).finish()
            }
            ClientMessage::Swing(swing) => WireWriter::new(PacketType::PlayerSwing)
                .put_vec3(swing.acceleration)
                .put_u8(swing.shot.tag())
                .finish(),
            ClientMessage::AbilityRequest { ability, trigger } => {
                WireWriter::new(PacketType::AbilityRequest)
                    .put_u8(ability.tag())
                    .put_u8(*trigger as u8)
                    .finish()
            }
        }
    }

    pub fn from_packet(packet: &Packet) -> Result<Self, PacketError> {
        let packet_type = packet.packet_type();
        match packet_type {
            PacketType::PlayerInput | PacketType::PlayerSwing | PacketType::AbilityRequest => {}
            other => return Err(PacketError::UnexpectedType(other)),
        }

        let mut r = WireReader::new(packet.expect_payload()?);
        match packet_type {
            PacketType::PlayerInput => {
                Ok(ClientMessage::Input(MoveInput::from_bits_truncate(r.u8()?)))
            }
            PacketType::PlayerSwing => {
                let acceleration = r.vec3()?;
                let tag = r.u8()?;
                let shot = ShotType::from_tag(tag).ok_or(invalid("shot type", tag))?;
                Ok(ClientMessage::Swing(SwingInput { acceleration, shot }))
            }
            _ => {
                let ability_tag = r.u8()?;
                let ability = AbilityType::from_tag(ability_tag)
                    .ok_or(invalid("ability", ability_tag))?;
                let trigger_tag = r.u8()?;
                let trigger = AbilityTrigger::from_tag(trigger_tag)
                    .ok_or(invalid("trigger", trigger_tag))?;
                Ok(ClientMessage::AbilityRequest { ability, trigger })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec3,
    pub name: String,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            position: player.position,
            name: player.name.clone(),
        }
    }
}

/// Score as it travels on the wire: points as tennis calls (Advantage is 50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    pub points: [i32; MAX_PLAYERS],
    pub current_set: i32,
    pub sets: [i32; MAX_PLAYERS],
    pub games: [[i32; MAX_PLAYERS]; MAX_WIRE_SETS],
}

impl From<&GameScore> for ScoreSnapshot {
    fn from(score: &GameScore) -> Self {
        let mut games = [[0i32; MAX_PLAYERS]; MAX_WIRE_SETS];
        for (slot, set) in games.iter_mut().zip(score.games_history()) {
            *slot = set.map(|g| g as i32);
        }
        Self {
            points: score.points().map(|p| p.as_wire()),
            current_set: score.current_set() as i32,
            sets: score.sets().map(|s| s as i32),
            games,
        }
    }
}

/// Authoritative state pushed to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    SetPlayerId(PlayerId),
    PlayerState(PlayerSnapshot),
    BallState(Ball),
    ScoreUpdate(ScoreSnapshot),
    GamePhase(GamePhase),
    AbilityState(AbilityState),
    MatchResult { winner: PlayerId },
}

impl ServerMessage {
    pub fn packet_type(&self) -> PacketType {
        match self {
            ServerMessage::SetPlayerId(_) => PacketType::SetPlayerId,
            ServerMessage::PlayerState(_) => PacketType::PlayerState,
            ServerMessage::BallState(_) => PacketType::BallState,
            ServerMessage::ScoreUpdate(_) => PacketType::ScoreUpdate,
            ServerMessage::GamePhase(_) => PacketType::GamePhase,
            ServerMessage::AbilityState(_) => PacketType::AbilityState,
            ServerMessage::MatchResult { .. } => PacketType::MatchResult,
        }
    }

    pub fn to_packet(&self) -> Packet {
        let mut w = WireWriter::new(self.packet_type());
        match self {
            ServerMessage::SetPlayerId(id) => {
                w.put_id(*id);
            }
            ServerMessage::PlayerState(p) => {
                w.put_id(p.id).put_vec3(p.position).put_name(&p.name);
            }
            ServerMessage::BallState(ball) => {
                w.put_vec3(ball.position)
                    .put_vec3(ball.velocity)
                    .put_f32(ball.previous_z)
                    .put_count(ball.bounce_count)
                    .put_count(ball.hit_count)
                    .put_id(ball.last_hit_player_id)
                    .put_f32(ball.gravity_multiplier);
            }
            ServerMessage::ScoreUpdate(score) => {
                w.put_i32(score.points[0])
                    .put_i32(score.points[1])
                    .put_i32(score.current_set)
                    .put_i32(score.sets[0])
                    .put_i32(score.sets[1]);
                for games in &score.games {
                    w.put_i32(games[0]).put_i32(games[1]);
                }
            }
            ServerMessage::GamePhase(phase) => {
                w.put_u8(phase.tag());
            }
            ServerMessage::AbilityState(state) => {
                w.put_id(state.player_id)
                    .put_u8(state.active_ability.tag())
                    .put_count(state.remaining_frames);
            }
            ServerMessage::MatchResult { winner } => {
                w.put_id(*winner);
            }
        }
        w.finish()
    }

    pub fn from_packet(packet: &Packet) -> Result<Self, PacketError> {
        let packet_type = packet.packet_type();
        let mut r = WireReader::new(packet.expect_payload()?);

        let message = match packet_type {
            PacketType::SetPlayerId => ServerMessage::SetPlayerId(r.player_id()?),
            PacketType::PlayerState => ServerMessage::PlayerState(PlayerSnapshot {
                id: r.player_id()?,
                position: r.vec3()?,
                name: r.name()?,
            }),
            PacketType::BallState => ServerMessage::BallState(Ball {
                position: r.vec3()?,
                velocity: r.vec3()?,
                previous_z: r.f32()?,
                bounce_count: r.count("bounce count")?,
                hit_count: r.count("hit count")?,
                last_hit_player_id: r.player_id()?,
                gravity_multiplier: r.f32()?,
            }),
            PacketType::ScoreUpdate => {
                let mut score = ScoreSnapshot {
                    points: [r.i32()?, r.i32()?],
                    current_set: r.i32()?,
                    sets: [r.i32()?, r.i32()?],
                    ..ScoreSnapshot::default()
                };
                for games in score.games.iter_mut() {
                    *games = [r.i32()?, r.i32()?];
                }
                ServerMessage::ScoreUpdate(score)
            }
            PacketType::GamePhase => {
                let tag = r.u8()?;
                let phase = GamePhase::from_tag(tag).ok_or(invalid("phase", tag))?;
                ServerMessage::GamePhase(phase)
            }
            PacketType::AbilityState => {
                let player_id = r.player_id()?;
                let tag = r.u8()?;
                let active_ability = AbilityType::from_tag(tag).ok_or(invalid("ability", tag))?;
                ServerMessage::AbilityState(AbilityState {
                    player_id,
                    active_ability,
                    remaining_frames: r.count("remaining frames")?,
                })
            }
            PacketType::MatchResult => ServerMessage::MatchResult {
                winner: r.player_id()?,
            },
            other => return Err(PacketError::UnexpectedType(other)),
        };
        Ok(message)
    }
}
