/// Treasure inventory of one team
///
/// Holds 9 counts (3 treasure types x 3 storage slots) and enforces both
/// capacity rules on every write:
/// - per type: slot1 + slot2 + slot3 <= quota(type)
/// - per slot: stone + gold + diamond <= MAX_PER_SLOT_TOTAL
use serde::{Deserialize, Serialize};

use super::ids::{PerTreasure, Slot, TreasureType};
use super::rules::{ScoringRules, MAX_PER_SLOT_TOTAL};

/// Sum of a type plus its per-slot breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreasureTotals {
    pub sum: u32,
    pub slot1: u32,
    pub slot2: u32,
    pub slot3: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: PerTreasure<[u32; 3]>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, treasure: TreasureType, slot: Slot) -> u32 {
        self.counts.get(treasure)[slot.index()]
    }

    /// Store `requested` clamped to every bound, returning the stored value
    ///
    /// Never fails: negative requests store 0, oversized requests store the
    /// largest value both capacity rules still allow.
    pub fn set_count(
        &mut self,
        rules: &ScoringRules,
        treasure: TreasureType,
        slot: Slot,
        requested: i64,
    ) -> u32 {
        let other_slots: u32 = Slot::ALL
            .into_iter()
            .filter(|s| *s != slot)
            .map(|s| self.count(treasure, s))
            .sum();
        let max_by_type = rules.quota(treasure).saturating_sub(other_slots);
        let max_by_slot = self.available_capacity(slot, treasure);

        let requested = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);
        let stored = requested.min(max_by_type).min(max_by_slot);

        if stored != requested {
            tracing::debug!(
                "Clamped {} in {} from {} to {} (type room {}, slot room {})",
                treasure,
                slot,
                requested,
                stored,
                max_by_type,
                max_by_slot
            );
        }

        self.counts.get_mut(treasure)[slot.index()] = stored;
        stored
    }

    /// Room left in `slot` for `treasure`, given the other two types stored there
    pub fn available_capacity(&self, slot: Slot, treasure: TreasureType) -> u32 {
        let other_types: u32 = TreasureType::ALL
            .into_iter()
            .filter(|t| *t != treasure)
            .map(|t| self.count(t, slot))
            .sum();
        MAX_PER_SLOT_TOTAL.saturating_sub(other_types)
    }

    pub fn totals(&self, treasure: TreasureType) -> TreasureTotals {
        let [slot1, slot2, slot3] = *self.counts.get(treasure);
        TreasureTotals {
            sum: slot1 + slot2 + slot3,
            slot1,
            slot2,
            slot3,
        }
    }

    /// Units of all types stored in one slot
    pub fn slot_total(&self, slot: Slot) -> u32 {
        TreasureType::ALL
            .into_iter()
            .map(|t| self.count(t, slot))
            .sum()
    }

    pub fn grand_total(&self) -> u32 {
        Slot::ALL.into_iter().map(|s| self.slot_total(s)).sum()
    }

    /// Points earned by the stored treasure under `rules`
    pub fn points(&self, rules: &ScoringRules) -> i64 {
        TreasureType::ALL
            .into_iter()
            .flat_map(|t| Slot::ALL.into_iter().map(move |s| (t, s)))
            .map(|(t, s)| i64::from(self.count(t, s)) * i64::from(rules.points(t, s)))
            .sum()
    }

    /// Whether this inventory qualifies for an absolute win
    ///
    /// Every slot holds something, at least one slot is full and the team
    /// holds 6 or more units overall.
    pub fn is_absolute_eligible(&self) -> bool {
        let slot_totals = Slot::ALL.map(|s| self.slot_total(s));
        let every_slot_used = slot_totals.iter().all(|&n| n >= 1);
        let some_slot_full = slot_totals.iter().any(|&n| n == MAX_PER_SLOT_TOTAL);
        let enough_overall = self.grand_total() >= 6;

        every_slot_used && some_slot_full && enough_overall
    }

    pub fn clear(&mut self) {
        self.counts = PerTreasure::default();
    }
}
