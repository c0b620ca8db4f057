// Settings module
// Schedule bounds and storage location, persisted as TOML

use serde::{Deserialize, Serialize};

use crate::schedule::time_slots::{ScheduleConfigError, TimeSlotGenerator};

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schedule: ScheduleSettings,
    pub database: DatabaseSettings,
}

/// Slot granularity and the two daily windows it is applied to.
///
/// Form selectors run one row past the grid so that a range can end at the
/// grid's closing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub step_minutes: u32,
    pub grid_start_hour: u32,
    pub grid_end_hour: u32,
    pub input_start_hour: u32,
    pub input_end_hour: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            step_minutes: 45,
            grid_start_hour: 7,
            grid_end_hour: 21,
            input_start_hour: 7,
            input_end_hour: 22,
        }
    }
}

impl ScheduleSettings {
    /// Row axis of the availability grid.
    pub fn grid_slots(&self) -> Result<TimeSlotGenerator, ScheduleConfigError> {
        TimeSlotGenerator::new(self.grid_start_hour, self.grid_end_hour, self.step_minutes)
    }

    /// Options offered by start/end time selectors.
    pub fn input_slots(&self) -> Result<TimeSlotGenerator, ScheduleConfigError> {
        TimeSlotGenerator::new(self.input_start_hour, self.input_end_hour, self.step_minutes)
    }

    pub fn validate(&self) -> Result<(), ScheduleConfigError> {
        self.grid_slots()?;
        self.input_slots()?;
        Ok(())
    }
}

/// Where the local document store lives. `None` means the platform data
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: Option<String>,
}
