//! Two-team treasure scoreboard engine.
//!
//! [`MatchEngine`] tracks each team's treasure inventory under per-type and
//! per-slot quotas, derives scores (with penalty/bonus adjustments and an
//! absolute-win override) and runs a drift-free countdown with pause/resume
//! and near-end/expired cues. Changes are broadcast on an [`EventBus`];
//! [`CommandExecutor`] serializes commands and the periodic tick onto a
//! single thread.

pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod messaging;
pub mod state;
pub mod time_text;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::Config;
pub use engine::{AbsoluteWinChange, MatchEngine, MatchSnapshot};
pub use error::{AppResult, CommandParseError, ConfigError};
pub use messaging::{Command, CommandExecutor, CommandResult, Event, EventBus};
pub use state::{CueKind, RunState, Slot, TeamColor, TeamId, TimerState, TreasureType};
pub use time_text::{format_time_text, parse_time_text};
