//! Availability scheduling grid.
//!
//! A grid is produced by composing the pieces of this module:
//! filter (`access`) → index (`indexer`) → resolve names (`alias`) →
//! render (`grid`). [`build_grid`] runs that pipeline over data that has
//! already been fetched; `controller` wraps it for asynchronous refreshes.

use std::collections::HashMap;

use crate::models::availability::AvailabilityRecord;
use crate::models::day::Weekday;
use crate::models::subject::Subject;
use crate::models::user::Role;

pub mod access;
pub mod alias;
pub mod controller;
pub mod grid;
pub mod indexer;
pub mod time_slots;

use access::{is_all_teachers_view, visible_record_filter, RecordFilter, TeacherSelection};
use grid::{AvailabilityGrid, GridRenderer, RenderOptions};
use time_slots::TimeSlotGenerator;

/// Who is looking at the grid and with which filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRequest {
    pub role: Role,
    pub viewer_id: String,
    pub selection: TeacherSelection,
    pub career_id: Option<String>,
}

impl GridRequest {
    pub fn new(
        role: Role,
        viewer_id: impl Into<String>,
        selection: TeacherSelection,
        career_id: Option<String>,
    ) -> Self {
        Self {
            role,
            viewer_id: viewer_id.into(),
            selection,
            career_id,
        }
    }

    pub fn filter(&self) -> RecordFilter {
        visible_record_filter(&self.role, &self.viewer_id, &self.selection)
    }

    pub fn all_teachers_view(&self) -> bool {
        is_all_teachers_view(&self.role, &self.selection)
    }
}

/// Data fetched for one render.
#[derive(Debug, Clone, Default)]
pub struct GridInputs {
    pub records: Vec<AvailabilityRecord>,
    pub subjects: HashMap<String, Subject>,
}

/// Run the full pipeline over fetched data.
pub fn build_grid(
    request: &GridRequest,
    inputs: GridInputs,
    slots: &TimeSlotGenerator,
) -> AvailabilityGrid {
    let slots = slots.slots();
    let records = request.filter().apply(inputs.records);
    let index = indexer::index_records(&records, &slots);

    let options = RenderOptions {
        role: &request.role,
        career_id: request.career_id.as_deref(),
        all_teachers_view: request.all_teachers_view(),
    };

    GridRenderer::default().render(&Weekday::ALL, &slots, &index, &inputs.subjects, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::TeacherRef;
    use crate::models::subject::SubjectHours;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use time_slots::TimeSlot;

    fn inputs() -> GridInputs {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let records = vec![
            AvailabilityRecord::new(&TeacherRef::new("T1", "Ana"), Weekday::Monday, t(8, 0), t(9, 0), "calc")
                .unwrap(),
            AvailabilityRecord::new(&TeacherRef::new("T2", "Luis"), Weekday::Monday, t(8, 0), t(9, 0), "calc")
                .unwrap(),
        ];
        let subjects = HashMap::from([(
            "calc".to_string(),
            Subject::new("Calculus", 1, SubjectHours::new(4, 2)).with_alias("c1", "Calc I"),
        )]);
        GridInputs { records, subjects }
    }

    fn slots() -> TimeSlotGenerator {
        TimeSlotGenerator::new(8, 9, 30).unwrap()
    }

    #[test]
    fn test_build_grid_filters_records_for_professor() {
        let request = GridRequest::new(Role::Profesor, "T1", TeacherSelection::All, Some("c1".into()));
        let grid = build_grid(&request, inputs(), &slots());

        let cell = grid.cell(Weekday::Monday, TimeSlot::parse("08:00").unwrap());
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].subject_label, "Calc I");
        assert_eq!(cell[0].teacher_label, None);
        // 08:00 and 08:30 are covered, 09:00 is not.
        assert_eq!(grid.entry_count(), 2);
    }

    #[test]
    fn test_build_grid_all_teachers_view() {
        let request = GridRequest::new(Role::Director, "D1", TeacherSelection::All, Some("c1".into()));
        let grid = build_grid(&request, inputs(), &slots());

        let cell = grid.cell(Weekday::Monday, TimeSlot::parse("08:30").unwrap());
        let teachers: Vec<_> = cell.iter().filter_map(|e| e.teacher_label.clone()).collect();
        assert_eq!(teachers, vec!["Ana".to_string(), "Luis".to_string()]);
        assert_eq!(cell[0].subject_label, "Calculus - Calc I");
    }

    #[test]
    fn test_build_grid_twice_is_structurally_equal() {
        let request = GridRequest::new(Role::Admin, "A1", TeacherSelection::All, None);
        let first = build_grid(&request, inputs(), &slots());
        let second = build_grid(&request, inputs(), &slots());
        assert_eq!(first, second);
    }
}
