/// State management module
///
/// Domain values owned by the match engine: identifiers, scoring rules,
/// team inventories and the countdown timer.

pub mod ids;
pub mod inventory;
pub mod rules;
pub mod team;
pub mod timer;

// Re-export commonly used types
pub use ids::{PerTeam, PerTreasure, Slot, TeamId, TreasureType};
pub use inventory::{Inventory, TreasureTotals};
pub use rules::{ScoringRules, ADJUSTMENT_POINTS, MAX_PER_SLOT_TOTAL};
pub use team::{normalize_team_name, TeamColor, TeamRecord};
pub use timer::{CountdownTimer, CueKind, RunState, TickOutcome, TimerState, DEFAULT_NEAR_END_WINDOW};
