use crate::ability::AbilityType;
use crate::phase::GamePhase;
use crate::player::PlayerId;
use crate::score::PointReason;

/// Something that happened during a tick and may need to reach the clients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerMoved {
        player_id: PlayerId,
    },
    BallStruck {
        player_id: PlayerId,
        hit_count: u32,
    },
    PointScored {
        winner: PlayerId,
        reason: PointReason,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    AbilityChanged {
        player_id: PlayerId,
        ability: AbilityType,
    },
    AbilityExpired {
        player_id: PlayerId,
    },
    MatchFinished {
        winner: PlayerId,
    },
}

impl GameEvent {
    /// Player whose PlayerState must be rebroadcast because of this event.
    pub fn moved_player(&self) -> Option<PlayerId> {
        match self {
            Self::PlayerMoved { player_id } | Self::BallStruck { player_id, .. } => {
                Some(*player_id)
            }
            _ => None,
        }
    }

    /// Player whose AbilityState must be rebroadcast because of this event.
    pub fn ability_player(&self) -> Option<PlayerId> {
        match self {
            Self::AbilityChanged { player_id, .. } | Self::AbilityExpired { player_id } => {
                Some(*player_id)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayerMoved { .. } => "player-moved",
            Self::BallStruck { .. } => "ball-struck",
            Self::PointScored { .. } => "point-scored",
            Self::PhaseChanged { .. } => "phase-changed",
            Self::AbilityChanged { .. } => "ability-changed",
            Self::AbilityExpired { .. } => "ability-expired",
            Self::MatchFinished { .. } => "match-finished",
        }
    }
}
