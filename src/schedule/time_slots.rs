//! Discretised time labels.
//!
//! A [`TimeSlotGenerator`] describes a daily window (`start_hour:00` to
//! `end_hour:00`, both inclusive) cut into fixed steps. The same generator
//! type feeds the grid's row axis and the time selectors of the forms; the
//! two simply use different bounds.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::utils::time;

/// Invalid generator bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleConfigError {
    #[error("start hour {start} is after end hour {end}")]
    StartAfterEnd { start: u32, end: u32 },
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(u32),
    #[error("step of {0} minutes is outside 1..=1440")]
    InvalidStep(u32),
}

/// A slot, identified by its start instant in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    start_minutes: u32,
}

impl TimeSlot {
    pub fn from_minutes(start_minutes: u32) -> Self {
        Self { start_minutes }
    }

    /// Parse an `HH:MM` label.
    pub fn parse(label: &str) -> Option<Self> {
        time::parse_hhmm(label).map(|t| Self::from_minutes(time::minutes_since_midnight(t)))
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_minutes
    }

    pub fn label(&self) -> String {
        time::format_minutes(self.start_minutes)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Bounds and step of a slot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlotGenerator {
    start_hour: u32,
    end_hour: u32,
    step_minutes: u32,
}

impl TimeSlotGenerator {
    pub fn new(start_hour: u32, end_hour: u32, step_minutes: u32) -> Result<Self, ScheduleConfigError> {
        if start_hour > 23 {
            return Err(ScheduleConfigError::HourOutOfRange(start_hour));
        }
        if end_hour > 23 {
            return Err(ScheduleConfigError::HourOutOfRange(end_hour));
        }
        if start_hour > end_hour {
            return Err(ScheduleConfigError::StartAfterEnd {
                start: start_hour,
                end: end_hour,
            });
        }
        if step_minutes == 0 || step_minutes > 24 * 60 {
            return Err(ScheduleConfigError::InvalidStep(step_minutes));
        }

        Ok(Self {
            start_hour,
            end_hour,
            step_minutes,
        })
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// A fresh iterator over the window. Each call restarts from the
    /// opening time.
    pub fn iter(&self) -> TimeSlots {
        TimeSlots {
            next: self.start_hour * 60,
            last: self.end_hour * 60,
            step: self.step_minutes,
        }
    }

    /// Number of slots: `floor((end - start) * 60 / step) + 1`.
    pub fn len(&self) -> usize {
        ((self.end_hour - self.start_hour) * 60 / self.step_minutes) as usize + 1
    }

    /// Never empty: the opening label is always produced.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        self.iter().collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|slot| slot.label()).collect()
    }
}

impl IntoIterator for &TimeSlotGenerator {
    type Item = TimeSlot;
    type IntoIter = TimeSlots;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, finite iterator over a slot window.
#[derive(Debug, Clone)]
pub struct TimeSlots {
    next: u32,
    last: u32,
    step: u32,
}

impl Iterator for TimeSlots {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let slot = TimeSlot::from_minutes(self.next);
        self.next += self.step;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next > self.last {
            0
        } else {
            ((self.last - self.next) / self.step) as usize + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeSlots {}
