/// Command types for the scoreboard
///
/// Commands represent requests to perform actions (imperative).
/// They are applied to the match engine by the command executor.
use crate::state::{Slot, TeamId, TreasureType};

/// Match commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rename both teams
    SetTeamNames { team1: String, team2: String },

    /// Recolor a team; invalid values are ignored
    SetTeamColor { team: TeamId, color: String },

    /// Set a treasure count (clamped by the engine)
    SetCount {
        team: TeamId,
        treasure: TreasureType,
        slot: Slot,
        value: i64,
    },

    /// Set the number of -5 infractions
    SetPenalty { team: TeamId, value: i64 },

    /// Set the number of +5 credits
    SetBonus { team: TeamId, value: i64 },

    /// Declare (or toggle off) an absolute winner; `None` clears
    SetAbsoluteWin { winner: Option<TeamId> },

    /// Zero inventories, adjustments and absolute win
    ResetScoring,

    /// Change a point value of the table
    SetPointValue {
        treasure: TreasureType,
        slot: Slot,
        value: u32,
    },

    /// Restore the configured point table and quotas
    ResetRules,

    /// Preset the countdown
    SetSeconds { seconds: i64 },

    Start,
    Pause,
    Resume,
    Toggle,

    /// Zero the countdown and clear any absolute win
    ResetTimer,

    /// Re-announce the current state to subscribers
    PublishSnapshot,

    /// Stop the command loop
    Quit,
}

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command applied
    Success,

    /// Command applied; carries the authoritative stored value
    SuccessWithValue(String),

    /// Command had no effect in the current state
    Ignored(String),
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::SetTeamNames { team1, team2 } => {
                format!("Set team names: {} / {}", team1, team2)
            }
            Command::SetTeamColor { team, color } => {
                format!("Set color of {}: {}", team, color)
            }
            Command::SetCount {
                team,
                treasure,
                slot,
                value,
            } => format!("Set {} {} in {} to {}", team, treasure, slot, value),
            Command::SetPenalty { team, value } => format!("Set penalty of {} to {}", team, value),
            Command::SetBonus { team, value } => format!("Set bonus of {} to {}", team, value),
            Command::SetAbsoluteWin { winner } => match winner {
                Some(team) => format!("Absolute win for {}", team),
                None => "Clear absolute win".to_string(),
            },
            Command::ResetScoring => "Reset scoring".to_string(),
            Command::SetPointValue {
                treasure,
                slot,
                value,
            } => format!("Set {} points in {} to {}", treasure, slot, value),
            Command::ResetRules => "Reset point table".to_string(),
            Command::SetSeconds { seconds } => format!("Set time to {}s", seconds),
            Command::Start => "Start timer".to_string(),
            Command::Pause => "Pause timer".to_string(),
            Command::Resume => "Resume timer".to_string(),
            Command::Toggle => "Toggle pause".to_string(),
            Command::ResetTimer => "Reset timer".to_string(),
            Command::PublishSnapshot => "Publish snapshot".to_string(),
            Command::Quit => "Quit".to_string(),
        }
    }
}
