//! Teaching weekdays.
//!
//! Availability is declared on a fixed, closed set of days (Monday through
//! Saturday). Stored documents use the Spanish day names the records were
//! originally written with; English names are accepted on input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A day on which availability can be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lunes", alias = "Monday")]
    Monday,
    #[serde(rename = "Martes", alias = "Tuesday")]
    Tuesday,
    #[serde(rename = "Miércoles", alias = "Wednesday")]
    Wednesday,
    #[serde(rename = "Jueves", alias = "Thursday")]
    Thursday,
    #[serde(rename = "Viernes", alias = "Friday")]
    Friday,
    #[serde(rename = "Sábado", alias = "Saturday")]
    Saturday,
}

impl Weekday {
    /// All teaching days in grid column order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Name as written in stored documents.
    pub fn stored_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
        }
    }

    /// Three-letter label for narrow table headers.
    pub fn short_name(&self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string is not a teaching day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a teaching day (Monday to Saturday)")]
pub struct ParseWeekdayError(pub String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| {
                day.name().to_lowercase() == needle
                    || day.stored_name().to_lowercase() == needle
                    || day.short_name().to_lowercase() == needle
            })
            .ok_or_else(|| ParseWeekdayError(s.to_string()))
    }
}
