/// Identifiers for teams, treasure types and storage slots
///
/// Small closed enums with the numeric/textual conversions the console and
/// the config file need, plus fixed-size tables keyed by them.
use serde::{Deserialize, Serialize};

/// One of the two competing teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    Team1,
    Team2,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::Team1, TeamId::Team2];

    /// Numeric id as shown to operators (1 or 2)
    pub fn number(self) -> u8 {
        match self {
            TeamId::Team1 => 1,
            TeamId::Team2 => 2,
        }
    }
}

impl TryFrom<u8> for TeamId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TeamId::Team1),
            2 => Ok(TeamId::Team2),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team {}", self.number())
    }
}

/// Kind of treasure a team can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasureType {
    Stone,
    Gold,
    Diamond,
}

impl TreasureType {
    pub const ALL: [TreasureType; 3] = [TreasureType::Stone, TreasureType::Gold, TreasureType::Diamond];

    pub fn label(self) -> &'static str {
        match self {
            TreasureType::Stone => "stone",
            TreasureType::Gold => "gold",
            TreasureType::Diamond => "diamond",
        }
    }

    /// Parse a lowercase or mixed-case type name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for TreasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Storage slot of a team (1, 2 or 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::First, Slot::Second, Slot::Third];

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
            Slot::Third => 2,
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::First),
            2 => Ok(Slot::Second),
            3 => Ok(Slot::Third),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot {}", self.number())
    }
}

/// A value per treasure type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerTreasure<T> {
    pub stone: T,
    pub gold: T,
    pub diamond: T,
}

impl<T> PerTreasure<T> {
    pub fn get(&self, treasure: TreasureType) -> &T {
        match treasure {
            TreasureType::Stone => &self.stone,
            TreasureType::Gold => &self.gold,
            TreasureType::Diamond => &self.diamond,
        }
    }

    pub fn get_mut(&mut self, treasure: TreasureType) -> &mut T {
        match treasure {
            TreasureType::Stone => &mut self.stone,
            TreasureType::Gold => &mut self.gold,
            TreasureType::Diamond => &mut self.diamond,
        }
    }
}

/// A value per team
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub team1: T,
    pub team2: T,
}

impl<T> PerTeam<T> {
    pub fn new(team1: T, team2: T) -> Self {
        Self { team1, team2 }
    }

    pub fn get(&self, team: TeamId) -> &T {
        match team {
            TeamId::Team1 => &self.team1,
            TeamId::Team2 => &self.team2,
        }
    }

    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::Team1 => &mut self.team1,
            TeamId::Team2 => &mut self.team2,
        }
    }
}
