//! Day × slot matrix of display entries.
//!
//! The renderer builds a fresh matrix on every call; nothing from a previous
//! render is carried over, so identical inputs always yield an identical
//! grid.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::day::Weekday;
use crate::models::subject::Subject;
use crate::models::user::Role;

use super::access::edit_permission;
use super::alias::AliasResolver;
use super::indexer::AvailabilityIndex;
use super::time_slots::TimeSlot;

/// What a single occupied cell shows for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    pub record_id: Option<String>,
    pub subject_label: String,
    /// Present only in the all-teachers view.
    pub teacher_label: Option<String>,
    /// Hover text, always naming the teacher.
    pub tooltip: String,
    pub editable: bool,
}

/// Rendered grid. Rows are slots, columns are days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityGrid {
    days: Vec<Weekday>,
    slots: Vec<TimeSlot>,
    cells: Vec<Vec<Vec<DisplayEntry>>>,
}

impl AvailabilityGrid {
    /// A grid with every cell empty.
    pub fn empty(days: &[Weekday], slots: &[TimeSlot]) -> Self {
        Self {
            days: days.to_vec(),
            slots: slots.to_vec(),
            cells: vec![vec![Vec::new(); days.len()]; slots.len()],
        }
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Entries in a cell; empty for free cells and for days or slots not on
    /// the grid.
    pub fn cell(&self, day: Weekday, slot: TimeSlot) -> &[DisplayEntry] {
        let Some(row) = self.slots.iter().position(|s| *s == slot) else {
            return &[];
        };
        let Some(col) = self.days.iter().position(|d| *d == day) else {
            return &[];
        };
        &self.cells[row][col]
    }

    /// Slot rows with one cell per day.
    pub fn rows(&self) -> impl Iterator<Item = (TimeSlot, &[Vec<DisplayEntry>])> {
        self.slots
            .iter()
            .copied()
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Total entries across all cells.
    pub fn entry_count(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// View context for a render.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub role: &'a Role,
    /// Career whose aliases apply in a single-teacher view.
    pub career_id: Option<&'a str>,
    pub all_teachers_view: bool,
}

/// Composes indexed records and subject names into an [`AvailabilityGrid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRenderer {
    resolver: AliasResolver,
}

impl GridRenderer {
    pub fn render(
        &self,
        days: &[Weekday],
        slots: &[TimeSlot],
        index: &AvailabilityIndex<'_>,
        subjects: &HashMap<String, Subject>,
        options: &RenderOptions<'_>,
    ) -> AvailabilityGrid {
        let mut grid = AvailabilityGrid::empty(days, slots);
        let editable = edit_permission(options.role);
        let career_context = options.career_id.filter(|_| !options.all_teachers_view);

        for (row, slot) in slots.iter().enumerate() {
            for (col, day) in days.iter().enumerate() {
                for record in index.get(*day, *slot) {
                    let subject = subjects.get(&record.subject_id);
                    let subject_label = match career_context {
                        Some(career_id) => self.resolver.resolve(subject, career_id),
                        None => self.resolver.resolve_full(subject),
                    };
                    let teacher_label = options
                        .all_teachers_view
                        .then(|| record.teacher_name.clone());

                    grid.cells[row][col].push(DisplayEntry {
                        record_id: record.id.clone(),
                        subject_label,
                        teacher_label,
                        tooltip: format!("Prof: {}", record.teacher_name),
                        editable,
                    });
                }
            }
        }

        grid
    }
}
