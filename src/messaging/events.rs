/// Event types for the scoreboard
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers as immutable values.
use crate::state::{CueKind, TeamColor, TeamId};

/// Scoreboard events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Displayed names or scores may have changed
    ScoreboardChanged {
        team1_name: String,
        score1: i64,
        team2_name: String,
        score2: i64,
    },

    /// Countdown text (`mm:ss`) changed
    TimeTextChanged { text: String },

    /// Timer running/paused flags changed
    RunStateChanged { running: bool, paused: bool },

    /// A team color was changed
    TeamColorChanged { team: TeamId, color: TeamColor },

    /// A countdown cue is due
    Cue { kind: CueKind },

    /// The command loop is shutting down
    Shutdown,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::ScoreboardChanged {
                team1_name,
                score1,
                team2_name,
                score2,
            } => {
                format!("{} {} - {} {}", team1_name, score1, score2, team2_name)
            }
            Event::TimeTextChanged { text } => format!("Time: {}", text),
            Event::RunStateChanged { running, paused } => match (running, paused) {
                (true, true) => "Timer paused".to_string(),
                (true, false) => "Timer running".to_string(),
                _ => "Timer stopped".to_string(),
            },
            Event::TeamColorChanged { team, color } => {
                format!("Color of {}: {}", team, color)
            }
            Event::Cue { kind } => match kind {
                CueKind::NearEnd => "Cue: near end".to_string(),
                CueKind::Expired => "Cue: time expired".to_string(),
            },
            Event::Shutdown => "Shutting down".to_string(),
        }
    }
}
