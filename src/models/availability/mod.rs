// Availability module
// A teacher's declared open time range on a weekday for a subject

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::day::Weekday;
use crate::utils::time::{self, hhmm};

/// Stored availability record.
///
/// `teacher_name` is a display cache copied at creation time; `teacher_id`
/// is authoritative. `subject_id` references a subject document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(rename = "teacherUid")]
    pub teacher_id: String,
    pub teacher_name: String,
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub subject_id: String,
}

impl AvailabilityRecord {
    /// Create a record, enforcing `start_time < end_time`.
    pub fn new(
        teacher: &TeacherRef,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        subject_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            id: None,
            teacher_id: teacher.id.clone(),
            teacher_name: teacher.name.clone(),
            day,
            start_time,
            end_time,
            subject_id: subject_id.into(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.teacher_id.trim().is_empty() {
            return Err(ValidationError::MissingField("teacher"));
        }
        if self.subject_id.trim().is_empty() {
            return Err(ValidationError::MissingField("subject"));
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::EndNotAfterStart);
        }
        Ok(())
    }

    pub fn start_minutes(&self) -> u32 {
        time::minutes_since_midnight(self.start_time)
    }

    pub fn end_minutes(&self) -> u32 {
        time::minutes_since_midnight(self.end_time)
    }

    /// Whether a slot starting at `slot_start` (minutes since midnight)
    /// falls inside the half-open range `[start, end)`.
    pub fn occupies(&self, slot_start: u32) -> bool {
        self.start_minutes() <= slot_start && slot_start < self.end_minutes()
    }
}

/// Identity of the teacher owning a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherRef {
    pub id: String,
    pub name: String,
}

impl TeacherRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Raw values submitted from the availability form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityForm {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: String,
}

/// Form values that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject_id: String,
}

impl AvailabilityForm {
    pub fn validate(&self) -> Result<ValidatedForm, ValidationError> {
        let day = required(&self.day, "day")?;
        let start = required(&self.start_time, "start time")?;
        let end = required(&self.end_time, "end time")?;
        let subject_id = required(&self.subject_id, "subject")?;

        let (day, start_time, end_time) = parse_range(day, start, end)?;

        Ok(ValidatedForm {
            day,
            start_time,
            end_time,
            subject_id: subject_id.to_string(),
        })
    }
}

impl ValidatedForm {
    pub fn into_record(self, teacher: &TeacherRef) -> Result<AvailabilityRecord, ValidationError> {
        AvailabilityRecord::new(
            teacher,
            self.day,
            self.start_time,
            self.end_time,
            self.subject_id,
        )
    }
}

/// Edit dialog values. Only the day and time range of a record can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityEdit {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilityEdit {
    pub fn validate(&self) -> Result<(Weekday, NaiveTime, NaiveTime), ValidationError> {
        let day = required(&self.day, "day")?;
        let start = required(&self.start_time, "start time")?;
        let end = required(&self.end_time, "end time")?;
        parse_range(day, start, end)
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn parse_range(
    day: &str,
    start: &str,
    end: &str,
) -> Result<(Weekday, NaiveTime, NaiveTime), ValidationError> {
    let day = day
        .parse::<Weekday>()
        .map_err(|_| ValidationError::InvalidDay(day.to_string()))?;
    let start_time = time::parse_hhmm(start).ok_or_else(|| ValidationError::InvalidTime {
        field: "start time",
        value: start.to_string(),
    })?;
    let end_time = time::parse_hhmm(end).ok_or_else(|| ValidationError::InvalidTime {
        field: "end time",
        value: end.to_string(),
    })?;

    if end_time <= start_time {
        return Err(ValidationError::EndNotAfterStart);
    }

    Ok((day, start_time, end_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(day: &str, start: &str, end: &str, subject: &str) -> AvailabilityForm {
        AvailabilityForm {
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            subject_id: subject.to_string(),
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_form_validates() {
        let valid = form("Lunes", "08:00", "09:30", "calc").validate().unwrap();
        assert_eq!(valid.day, Weekday::Monday);
        assert_eq!(valid.start_time, t(8, 0));
        assert_eq!(valid.end_time, t(9, 30));
        assert_eq!(valid.subject_id, "calc");
    }

    #[test]
    fn test_form_missing_field() {
        let err = form("Monday", "08:00", "09:00", "  ").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("subject"));
    }

    #[test]
    fn test_form_end_equal_to_start() {
        let err = form("Monday", "08:00", "08:00", "calc").validate().unwrap_err();
        assert_eq!(err, ValidationError::EndNotAfterStart);
    }

    #[test]
    fn test_form_end_before_start() {
        let err = form("Monday", "10:00", "08:45", "calc").validate().unwrap_err();
        assert_eq!(err, ValidationError::EndNotAfterStart);
    }

    #[test]
    fn test_form_bad_time() {
        let err = form("Monday", "8am", "09:00", "calc").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTime { field: "start time", .. }));
    }

    #[test]
    fn test_form_bad_day() {
        let err = form("Sunday", "08:00", "09:00", "calc").validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidDay("Sunday".to_string()));
    }

    #[test]
    fn test_record_occupies_half_open_range() {
        let teacher = TeacherRef::new("T1", "Ana");
        let record = AvailabilityRecord::new(&teacher, Weekday::Monday, t(8, 0), t(9, 30), "calc")
            .unwrap();

        assert!(!record.occupies(7 * 60 + 15));
        assert!(record.occupies(8 * 60));
        assert!(record.occupies(8 * 60 + 45));
        assert!(!record.occupies(9 * 60 + 30));
    }

    #[test]
    fn test_record_serializes_with_stored_field_names() {
        let teacher = TeacherRef::new("T1", "Ana");
        let record = AvailabilityRecord::new(&teacher, Weekday::Friday, t(7, 0), t(7, 45), "calc")
            .unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["teacherUid"], "T1");
        assert_eq!(value["teacherName"], "Ana");
        assert_eq!(value["day"], "Viernes");
        assert_eq!(value["startTime"], "07:00");
        assert_eq!(value["endTime"], "07:45");
        assert_eq!(value["subjectId"], "calc");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_edit_validation() {
        let edit = AvailabilityEdit {
            day: "Martes".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:30".to_string(),
        };
        assert_eq!(edit.validate().unwrap(), (Weekday::Tuesday, t(10, 0), t(11, 30)));
    }
}
