use rally::{DEFAULT_TICK_RATE, MatchSettings};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub tick_rate: u32,
    pub match_settings: MatchSettings,
    /// Reset for another match after GameFinished instead of shutting down.
    pub rematch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            match_settings: MatchSettings::default(),
            rematch: false,
        }
    }
}
