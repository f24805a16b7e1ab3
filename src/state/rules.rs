/// Scoring rules: point values and per-team quotas
use serde::{Deserialize, Serialize};

use super::ids::{PerTreasure, Slot, TreasureType};

/// Maximum number of units (all types combined) one storage slot can hold
pub const MAX_PER_SLOT_TOTAL: u32 = 3;

/// Points awarded or deducted per penalty/bonus unit
pub const ADJUSTMENT_POINTS: i64 = 5;

/// Point values for slots 1, 2 and 3
pub type SlotPoints = [u32; 3];

/// Point table and quotas applied to both teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points per unit, per treasure type and slot
    pub point_table: PerTreasure<SlotPoints>,

    /// Max units of a type a single team may hold across its three slots
    pub per_type_quota: PerTreasure<u32>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            point_table: PerTreasure {
                stone: [5, 7, 10],
                gold: [15, 17, 20],
                diamond: [30, 32, 35],
            },
            per_type_quota: PerTreasure {
                stone: 4,
                gold: 3,
                diamond: 2,
            },
        }
    }
}

impl ScoringRules {
    pub fn points(&self, treasure: TreasureType, slot: Slot) -> u32 {
        self.point_table.get(treasure)[slot.index()]
    }

    pub fn quota(&self, treasure: TreasureType) -> u32 {
        *self.per_type_quota.get(treasure)
    }

    pub fn set_points(&mut self, treasure: TreasureType, slot: Slot, value: u32) {
        self.point_table.get_mut(treasure)[slot.index()] = value;
    }
}
