use serde::{Deserialize, Serialize};

use crate::player::{MAX_PLAYERS, PlayerId, opponent};

pub const DEFAULT_GAMES_TO_WIN_SET: u32 = 6;
pub const DEFAULT_SETS_TO_WIN: u32 = 2;

/// Longest match a ScoreUpdate can describe: best of five.
pub const MAX_SETS: usize = 5;
pub const MAX_SETS_TO_WIN: u32 = (MAX_SETS as u32 + 1) / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("a set needs at least one game")]
    NoGames,
    #[error("a match needs at least one set")]
    NoSets,
    #[error("best of {0} sets does not fit in {max} set slots", max = MAX_SETS)]
    TooManySets(usize),
}

/// Points within the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PointScore {
    #[default]
    Love,
    Fifteen,
    Thirty,
    Forty,
    Advantage,
}

impl PointScore {
    /// Conventional tennis call; Advantage travels as 50.
    pub fn as_wire(self) -> i32 {
        match self {
            PointScore::Love => 0,
            PointScore::Fifteen => 15,
            PointScore::Thirty => 30,
            PointScore::Forty => 40,
            PointScore::Advantage => 50,
        }
    }

    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(PointScore::Love),
            15 => Some(PointScore::Fifteen),
            30 => Some(PointScore::Thirty),
            40 => Some(PointScore::Forty),
            50 => Some(PointScore::Advantage),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PointScore::Love => "0",
            PointScore::Fifteen => "15",
            PointScore::Thirty => "30",
            PointScore::Forty => "40",
            PointScore::Advantage => "AD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    pub games_to_win_set: u32,
    pub sets_to_win: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            games_to_win_set: DEFAULT_GAMES_TO_WIN_SET,
            sets_to_win: DEFAULT_SETS_TO_WIN,
        }
    }
}

impl MatchRules {
    pub fn max_sets(&self) -> usize {
        (self.sets_to_win.max(1) * 2 - 1) as usize
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.games_to_win_set == 0 {
            return Err(RulesError::NoGames);
        }
        if self.sets_to_win == 0 {
            return Err(RulesError::NoSets);
        }
        if self.max_sets() > MAX_SETS {
            return Err(RulesError::TooManySets(self.max_sets()));
        }
        Ok(())
    }

    /// Pulls both thresholds into the supported range.
    pub fn clamped(self) -> Self {
        Self {
            games_to_win_set: self.games_to_win_set.max(1),
            sets_to_win: self.sets_to_win.clamp(1, MAX_SETS_TO_WIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScore {
    rules: MatchRules,
    points: [PointScore; MAX_PLAYERS],
    /// Games won by each player, one entry per set played so far.
    games: Vec<[u32; MAX_PLAYERS]>,
    current_set: usize,
    sets: [u32; MAX_PLAYERS],
}

impl Default for GameScore {
    fn default() -> Self {
        Self::new(MatchRules::default())
    }
}

impl GameScore {
    pub fn new(rules: MatchRules) -> Self {
        let rules = match rules.validate() {
            Ok(()) => rules,
            Err(e) => {
                log::warn!("Unsupported match rules ({}), clamping", e);
                rules.clamped()
            }
        };
        Self {
            rules,
            points: [PointScore::Love; MAX_PLAYERS],
            games: vec![[0; MAX_PLAYERS]],
            current_set: 0,
            sets: [0; MAX_PLAYERS],
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn point(&self, player: PlayerId) -> PointScore {
        self.points[player]
    }

    pub fn points(&self) -> [PointScore; MAX_PLAYERS] {
        self.points
    }

    pub fn games_in_set(&self, set: usize) -> [u32; MAX_PLAYERS] {
        self.games.get(set).copied().unwrap_or([0; MAX_PLAYERS])
    }

    pub fn current_games(&self) -> [u32; MAX_PLAYERS] {
        self.games_in_set(self.current_set)
    }

    pub fn games_history(&self) -> &[[u32; MAX_PLAYERS]] {
        &self.games
    }

    pub fn current_set(&self) -> usize {
        self.current_set
    }

    pub fn sets(&self) -> [u32; MAX_PLAYERS] {
        self.sets
    }

    pub fn is_match_finished(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        (0..MAX_PLAYERS).find(|&p| self.sets[p] >= self.rules.sets_to_win)
    }

    /// Awards one point to `winner`. Returns `false` exactly when this point ends the match,
    /// or when the match was already over.
    pub fn add_point(&mut self, winner: PlayerId) -> bool {
        if winner >= MAX_PLAYERS {
            log::warn!("add_point: invalid player id {}", winner);
            return !self.is_match_finished();
        }
        if self.is_match_finished() {
            return false;
        }

        let loser = opponent(winner);
        let win_pt = self.points[winner];
        let lose_pt = self.points[loser];

        match win_pt {
            PointScore::Love => self.points[winner] = PointScore::Fifteen,
            PointScore::Fifteen => self.points[winner] = PointScore::Thirty,
            PointScore::Thirty => self.points[winner] = PointScore::Forty,
            PointScore::Forty => match lose_pt {
                PointScore::Forty => self.points[winner] = PointScore::Advantage,
                PointScore::Advantage => self.points[loser] = PointScore::Forty,
                _ => return self.award_game(winner),
            },
            PointScore::Advantage => return self.award_game(winner),
        }

        true
    }

    fn award_game(&mut self, winner: PlayerId) -> bool {
        self.points = [PointScore::Love; MAX_PLAYERS];

        let set = self.current_set;
        self.games[set][winner] += 1;
        let games = self.games[set];
        log::info!(
            "Player {} wins the game (set {}: {} - {})",
            winner,
            set + 1,
            games[0],
            games[1]
        );

        if games[winner] >= self.rules.games_to_win_set {
            return self.award_set(winner);
        }

        true
    }

    fn award_set(&mut self, winner: PlayerId) -> bool {
        self.sets[winner] += 1;
        log::info!(
            "Player {} wins set {} (sets {} - {})",
            winner,
            self.current_set + 1,
            self.sets[0],
            self.sets[1]
        );

        if self.is_match_finished() {
            log::info!("Match finished, player {} wins", winner);
            return false;
        }

        self.current_set += 1;
        self.games.push([0; MAX_PLAYERS]);
        true
    }

    pub fn summary(&self) -> String {
        let games = self.current_games();
        format!(
            "sets {}-{} | games {}-{} | points {}-{}",
            self.sets[0],
            self.sets[1],
            games[0],
            games[1],
            self.points[0].as_str(),
            self.points[1].as_str()
        )
    }
}
