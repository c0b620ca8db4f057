// Time-of-day utility functions
// Wall-clock "HH:MM" values used by availability records and grid slots

use chrono::{NaiveTime, Timelike};

/// Format used for every stored and displayed time-of-day value.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse an `HH:MM` string into a `NaiveTime`.
///
/// Surrounding whitespace is ignored; seconds are not accepted.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Format a time as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Format a minute offset from midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Serde adapter storing a `NaiveTime` as an `HH:MM` string.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("08:45"), NaiveTime::from_hms_opt(8, 45, 0));
        assert_eq!(parse_hhmm(" 21:00 "), NaiveTime::from_hms_opt(21, 0, 0));
    }

    #[test]
    fn test_parse_hhmm_rejects_garbage() {
        assert!(parse_hhmm("").is_none());
        assert!(parse_hhmm("8h").is_none());
        assert!(parse_hhmm("25:00").is_none());
        assert!(parse_hhmm("10:61").is_none());
    }

    #[test]
    fn test_minutes_since_midnight() {
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(minutes_since_midnight(time), 570);
    }

    #[test]
    fn test_format_round_trip_padding() {
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_hhmm(time), "07:05");
        assert_eq!(format_minutes(425), "07:05");
    }
}
