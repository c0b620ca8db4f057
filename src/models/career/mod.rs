//! Career model and its curriculum.
//!
//! The curriculum assigns subject ids to semester numbers. Semester keys are
//! stored as strings (`"1"`, `"2"`, ...) to match the document layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;

/// Semester number to the subject ids assigned to it.
pub type Curriculum = BTreeMap<String, Vec<String>>;

/// A career (degree programme).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    pub semesters: u32,
    #[serde(default)]
    pub curriculum: Curriculum,
}

impl Career {
    pub fn new(name: impl Into<String>, semesters: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            semesters,
            curriculum: Curriculum::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.semesters == 0 {
            return Err(ValidationError::InvalidSemester);
        }
        validate_curriculum(&self.curriculum, self.semesters)
    }

    /// Subject ids assigned to a semester (empty when none).
    pub fn subjects_in(&self, semester: u32) -> &[String] {
        self.curriculum
            .get(&semester.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a subject is assigned to any semester of this career.
    pub fn is_assigned(&self, subject_id: &str) -> bool {
        self.curriculum
            .values()
            .any(|ids| ids.iter().any(|id| id == subject_id))
    }

    /// Semester numbers `1..=semesters`, for pickers.
    pub fn semester_numbers(&self) -> impl Iterator<Item = u32> {
        1..=self.semesters
    }
}

/// Check that every semester key is a number within `1..=semesters`.
pub fn validate_curriculum(curriculum: &Curriculum, semesters: u32) -> Result<(), ValidationError> {
    for key in curriculum.keys() {
        let semester: u32 = key
            .parse()
            .map_err(|_| ValidationError::InvalidSemester)?;
        if semester == 0 {
            return Err(ValidationError::InvalidSemester);
        }
        if semester > semesters {
            return Err(ValidationError::SemesterOutOfRange {
                semester,
                max: semesters,
            });
        }
    }
    Ok(())
}

/// Build a curriculum from `(semester, subject ids)` pairs, dropping
/// semesters that end up empty.
pub fn curriculum_from<I>(entries: I) -> Curriculum
where
    I: IntoIterator<Item = (u32, Vec<String>)>,
{
    entries
        .into_iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(semester, ids)| (semester.to_string(), ids))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career_with_curriculum() -> Career {
        let mut career = Career::new("Systems Engineering", 4);
        career.curriculum = curriculum_from(vec![
            (1, vec!["calc".to_string(), "prog".to_string()]),
            (2, vec![]),
            (3, vec!["db".to_string()]),
        ]);
        career
    }

    #[test]
    fn test_curriculum_drops_empty_semesters() {
        let career = career_with_curriculum();
        assert_eq!(career.curriculum.len(), 2);
        assert!(career.subjects_in(2).is_empty());
        assert_eq!(career.subjects_in(1), &["calc".to_string(), "prog".to_string()]);
    }

    #[test]
    fn test_is_assigned() {
        let career = career_with_curriculum();
        assert!(career.is_assigned("db"));
        assert!(!career.is_assigned("physics"));
    }

    #[test]
    fn test_validate_semester_out_of_range() {
        let mut career = career_with_curriculum();
        career.semesters = 2;
        assert_eq!(
            career.validate(),
            Err(ValidationError::SemesterOutOfRange { semester: 3, max: 2 })
        );
    }

    #[test]
    fn test_validate_requires_name_and_semesters() {
        assert_eq!(
            Career::new("", 8).validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            Career::new("Law", 0).validate(),
            Err(ValidationError::InvalidSemester)
        );
    }

    #[test]
    fn test_curriculum_json_layout() {
        let career = career_with_curriculum();
        let value = serde_json::to_value(&career).unwrap();
        assert_eq!(value["curriculum"]["3"][0], "db");
        assert_eq!(value["semesters"], 4);
    }
}
