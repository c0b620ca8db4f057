//! Role-scoped visibility and editability of availability records.
//!
//! Rules, first match wins:
//! 1. `profesor` sees only their own records; any teacher selection is ignored.
//! 2. `admin`/`director` with no selection (or "all") see every record.
//! 3. `admin`/`director` with a concrete teacher see that teacher's records.
//! 4. Any other role sees nothing.

use crate::models::availability::AvailabilityRecord;
use crate::models::user::Role;

/// Value of the teacher filter meaning "every teacher".
pub const ALL_TEACHERS: &str = "all";

/// Teacher filter chosen by a supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TeacherSelection {
    #[default]
    All,
    Teacher(String),
}

impl TeacherSelection {
    /// Interpret a raw filter value; empty and "all" select everyone.
    pub fn from_filter(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_TEACHERS) => TeacherSelection::All,
            Some(id) => TeacherSelection::Teacher(id.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TeacherSelection::All)
    }
}

/// Which records a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    OwnedBy(String),
    Nothing,
}

impl RecordFilter {
    pub fn matches(&self, record: &AvailabilityRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::OwnedBy(teacher_id) => record.teacher_id == *teacher_id,
            RecordFilter::Nothing => false,
        }
    }

    /// Keep the records this filter admits.
    pub fn apply(&self, records: Vec<AvailabilityRecord>) -> Vec<AvailabilityRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Visibility filter for a viewer.
pub fn visible_record_filter(
    role: &Role,
    viewer_id: &str,
    selection: &TeacherSelection,
) -> RecordFilter {
    match role {
        Role::Profesor => RecordFilter::OwnedBy(viewer_id.to_string()),
        Role::Admin | Role::Director => match selection {
            TeacherSelection::All => RecordFilter::All,
            TeacherSelection::Teacher(id) => RecordFilter::OwnedBy(id.clone()),
        },
        Role::Other(_) => RecordFilter::Nothing,
    }
}

/// Whether a role may edit or delete the records it can see.
///
/// Supervisors may edit any visible record, including other teachers'.
pub fn edit_permission(role: &Role) -> bool {
    match role {
        Role::Profesor | Role::Admin | Role::Director => true,
        Role::Other(_) => false,
    }
}

/// Whether the viewer is looking at every teacher at once.
pub fn is_all_teachers_view(role: &Role, selection: &TeacherSelection) -> bool {
    matches!(role, Role::Admin | Role::Director) && selection.is_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::TeacherRef;
    use crate::models::day::Weekday;
    use crate::models::user::UserProfile;
    use chrono::NaiveTime;
    use test_case::test_case;

    fn record_for(teacher: &str) -> AvailabilityRecord {
        AvailabilityRecord::new(
            &TeacherRef::new(teacher, teacher),
            Weekday::Monday,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "calc",
        )
        .unwrap()
    }

    fn owners(filter: &RecordFilter) -> Vec<String> {
        filter
            .apply(vec![record_for("T1"), record_for("T2"), record_for("T1")])
            .into_iter()
            .map(|r| r.teacher_id)
            .collect()
    }

    #[test_case(TeacherSelection::All ; "no selection")]
    #[test_case(TeacherSelection::Teacher("T2".to_string()) ; "selection ignored")]
    fn test_profesor_sees_only_own(selection: TeacherSelection) {
        let filter = visible_record_filter(&Role::Profesor, "T1", &selection);
        assert_eq!(owners(&filter), vec!["T1", "T1"]);
    }

    #[test_case(Role::Admin)]
    #[test_case(Role::Director)]
    fn test_supervisor_all(role: Role) {
        let filter = visible_record_filter(&role, "A1", &TeacherSelection::from_filter(Some("all")));
        assert_eq!(filter, RecordFilter::All);
        assert_eq!(owners(&filter).len(), 3);
    }

    #[test]
    fn test_supervisor_selected_teacher() {
        let selection = TeacherSelection::from_filter(Some("T2"));
        let filter = visible_record_filter(&Role::Admin, "A1", &selection);
        assert_eq!(owners(&filter), vec!["T2"]);
    }

    #[test]
    fn test_unknown_role_sees_nothing() {
        let filter = visible_record_filter(
            &Role::Other("profesr".to_string()),
            "T1",
            &TeacherSelection::All,
        );
        assert!(owners(&filter).is_empty());
    }

    #[test_case("Admin" ; "capitalised")]
    #[test_case(" director" ; "leading space")]
    #[test_case("PROFESOR" ; "uppercase")]
    fn test_stored_role_variants_fail_closed(raw: &str) {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "email": "x@school.edu",
            "nombre": "X",
            "rol": raw,
        }))
        .unwrap();

        let filter = visible_record_filter(&profile.rol, "T1", &TeacherSelection::All);
        assert_eq!(filter, RecordFilter::Nothing);
        assert!(!edit_permission(&profile.rol));
    }

    #[test_case(Role::Profesor, true)]
    #[test_case(Role::Admin, true)]
    #[test_case(Role::Director, true)]
    #[test_case(Role::Other("guest".to_string()), false)]
    fn test_edit_permission(role: Role, expected: bool) {
        assert_eq!(edit_permission(&role), expected);
    }

    #[test]
    fn test_selection_from_filter() {
        assert_eq!(TeacherSelection::from_filter(None), TeacherSelection::All);
        assert_eq!(TeacherSelection::from_filter(Some(" ")), TeacherSelection::All);
        assert!(is_all_teachers_view(&Role::Director, &TeacherSelection::All));
        assert!(!is_all_teachers_view(&Role::Profesor, &TeacherSelection::All));
    }
}
