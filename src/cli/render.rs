// Plain-text output for the terminal

use crate::models::subject::Subject;
use crate::models::user::UserProfile;
use crate::schedule::grid::{AvailabilityGrid, DisplayEntry};

const TIME_HEADER: &str = "Time";

fn entry_text(entry: &DisplayEntry) -> String {
    match &entry.teacher_label {
        Some(teacher) => format!("{} ({})", entry.subject_label, teacher),
        None => entry.subject_label.clone(),
    }
}

/// Slot rows by day columns; multiple entries in a cell are joined by "; ".
pub fn grid_table(grid: &AvailabilityGrid) -> String {
    let header: Vec<String> = std::iter::once(TIME_HEADER.to_string())
        .chain(grid.days().iter().map(|d| d.short_name().to_string()))
        .collect();

    let body: Vec<Vec<String>> = grid
        .rows()
        .map(|(slot, cells)| {
            std::iter::once(slot.label())
                .chain(cells.iter().map(|entries| {
                    entries
                        .iter()
                        .map(entry_text)
                        .collect::<Vec<_>>()
                        .join("; ")
                }))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

pub fn teacher_list(teachers: &[UserProfile]) -> String {
    let mut out = String::from("all\tAll teachers\n");
    for teacher in teachers {
        out.push_str(&format!("{}\t{}\n", teacher.uid, teacher.nombre));
    }
    out
}

pub fn subject_list(subjects: &[Subject]) -> String {
    subjects
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\tsemester {}\t{}h\t{}\n",
                s.id.as_deref().unwrap_or("-"),
                s.name,
                s.semester,
                s.hours.total,
                s.aliases_preview()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day::Weekday;
    use crate::schedule::time_slots::TimeSlotGenerator;

    #[test]
    fn test_empty_grid_table_has_header_and_slot_rows() {
        let slots = TimeSlotGenerator::new(7, 8, 30).unwrap();
        let grid = AvailabilityGrid::empty(&Weekday::ALL, &slots.slots());

        let table = grid_table(&grid);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 2 + 3);
        assert_eq!(lines[0], "Time  | Mon | Tue | Wed | Thu | Fri | Sat");
        assert!(lines[2].starts_with("07:00"));
        assert!(lines[4].starts_with("08:00"));
    }

    #[test]
    fn test_entry_text_names_teacher_only_when_present() {
        let mut entry = DisplayEntry {
            record_id: None,
            subject_label: "Calculus".to_string(),
            teacher_label: Some("Ana".to_string()),
            tooltip: "Prof: Ana".to_string(),
            editable: true,
        };
        assert_eq!(entry_text(&entry), "Calculus (Ana)");
        entry.teacher_label = None;
        assert_eq!(entry_text(&entry), "Calculus");
    }
}
