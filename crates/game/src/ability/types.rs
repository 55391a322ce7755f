use serde::{Deserialize, Serialize};

pub const ABILITY_SPEED_UP_MULTIPLIER: f32 = 2.0;
pub const ABILITY_SPRINT_MULTIPLIER: f32 = 1.5;
pub const ABILITY_GIANT_RADIUS_MULTIPLIER: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum AbilityType {
    #[default]
    None = 0,
    SpeedUp = 1,
    Giant = 2,
    Clone = 3,
    Sprint = 4,
    Taunt = 5,
}

impl AbilityType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AbilityType::None),
            1 => Some(AbilityType::SpeedUp),
            2 => Some(AbilityType::Giant),
            3 => Some(AbilityType::Clone),
            4 => Some(AbilityType::Sprint),
            5 => Some(AbilityType::Taunt),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbilityType::None => "none",
            AbilityType::SpeedUp => "speed-up",
            AbilityType::Giant => "giant",
            AbilityType::Clone => "clone",
            AbilityType::Sprint => "sprint",
            AbilityType::Taunt => "taunt",
        }
    }

    pub fn config(self) -> Option<&'static AbilityConfig> {
        ABILITY_TABLE.iter().find(|c| c.ability == self)
    }

    pub fn kind(self) -> Option<AbilityKind> {
        self.config().map(|c| c.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    /// Active while the button is held.
    Toggle,
    /// Counts down once per tick, then clears.
    Timed,
    /// Spent by the next successful swing; expires like a timed ability if unused.
    Consumable,
}

#[derive(Debug, Clone, Copy)]
pub struct AbilityConfig {
    pub ability: AbilityType,
    pub kind: AbilityKind,
    pub duration_frames: u32,
    /// Presentation-only abilities are resolved by clients and ignored here.
    pub requires_server: bool,
}

pub static ABILITY_TABLE: &[AbilityConfig] = &[
    AbilityConfig {
        ability: AbilityType::SpeedUp,
        kind: AbilityKind::Consumable,
        duration_frames: 600,
        requires_server: true,
    },
    AbilityConfig {
        ability: AbilityType::Giant,
        kind: AbilityKind::Toggle,
        duration_frames: 0,
        requires_server: true,
    },
    AbilityConfig {
        ability: AbilityType::Clone,
        kind: AbilityKind::Toggle,
        duration_frames: 0,
        requires_server: true,
    },
    AbilityConfig {
        ability: AbilityType::Sprint,
        kind: AbilityKind::Timed,
        duration_frames: 180,
        requires_server: true,
    },
    AbilityConfig {
        ability: AbilityType::Taunt,
        kind: AbilityKind::Timed,
        duration_frames: 90,
        requires_server: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AbilityTrigger {
    Press = 0,
    Release = 1,
}

impl AbilityTrigger {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AbilityTrigger::Press),
            1 => Some(AbilityTrigger::Release),
            _ => None,
        }
    }
}
