use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// How close (in minutes, either side) the clock must be to the reminder time
pub const DUE_WINDOW_MINUTES: i64 = 5;

/// A user's daily reading reminder. One per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub days: Vec<Weekday>,
    pub is_active: bool,
}

impl Reminder {
    /// Whether the reminder should fire at the given local time.
    ///
    /// Compares minutes since midnight; a window never spans midnight.
    pub fn is_due_at(&self, now: NaiveDateTime) -> bool {
        if !self.is_active || !self.days.contains(&now.weekday()) {
            return false;
        }
        let now_minutes = i64::from(now.hour() * 60 + now.minute());
        let reminder_minutes = i64::from(self.time.hour() * 60 + self.time.minute());
        (now_minutes - reminder_minutes).abs() <= DUE_WINDOW_MINUTES
    }
}

/// A stored reminder with its owner and last update time
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredReminder {
    pub user_id: i64,
    #[serde(flatten)]
    pub reminder: Reminder,
    pub updated_at: DateTime<Utc>,
}

/// Parse weekday names as stored in the database ("Mon", "Tue", ...)
pub fn parse_weekdays(names: &[String]) -> Vec<Weekday> {
    names.iter().filter_map(|n| n.parse::<Weekday>().ok()).collect()
}

pub fn weekday_names(days: &[Weekday]) -> Vec<String> {
    days.iter().map(|d| d.to_string()).collect()
}

/// Serde adapter for `HH:MM` times
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
