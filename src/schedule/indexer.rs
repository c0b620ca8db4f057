//! Maps availability ranges onto grid cells.
//!
//! A record occupies a slot iff `start <= slot_start < end`. Only the slot's
//! start instant is tested, so a range ending mid-slot still covers that
//! slot, and a slot starting exactly at the end time is not covered.
//! Overlapping records are kept side by side; nothing is merged or rejected.

use std::collections::HashMap;

use crate::models::availability::AvailabilityRecord;
use crate::models::day::Weekday;

use super::time_slots::TimeSlot;

/// Records occupying each `(day, slot)` cell, in input order.
#[derive(Debug, Default)]
pub struct AvailabilityIndex<'a> {
    cells: HashMap<(Weekday, TimeSlot), Vec<&'a AvailabilityRecord>>,
}

impl<'a> AvailabilityIndex<'a> {
    /// Records in a cell; empty when the cell is free.
    pub fn get(&self, day: Weekday, slot: TimeSlot) -> &[&'a AvailabilityRecord] {
        self.cells
            .get(&(day, slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Slots of `slots` covered by a single record.
pub fn slots_for(record: &AvailabilityRecord, slots: &[TimeSlot]) -> Vec<TimeSlot> {
    slots
        .iter()
        .copied()
        .filter(|slot| record.occupies(slot.start_minutes()))
        .collect()
}

/// Index every record against the slot sequence. O(records × slots).
pub fn index_records<'a>(
    records: &'a [AvailabilityRecord],
    slots: &[TimeSlot],
) -> AvailabilityIndex<'a> {
    let mut index = AvailabilityIndex::default();

    for record in records {
        for slot in slots_for(record, slots) {
            index
                .cells
                .entry((record.day, slot))
                .or_default()
                .push(record);
        }
    }

    log::debug!(
        "Indexed {} availability records into {} cells",
        records.len(),
        index.occupied_cells()
    );

    index
}
