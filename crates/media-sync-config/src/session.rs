use chrono::{DateTime, Local};
use serde::Serialize;

/// Identity of one sync run, fixed at start-up
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionStamp {
    started_at: DateTime<Local>,
}

impl SessionStamp {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(started_at: DateTime<Local>) -> Self {
        Self { started_at }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Stamp used in log file names (12-hour clock with AM/PM)
    pub fn file_stamp(&self) -> String {
        self.started_at.format("%Y_%m_%d-%I_%M_%S_%p").to_string()
    }
}

impl std::fmt::Display for SessionStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.started_at.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_stamp_morning() {
        let started = Local.with_ymd_and_hms(2023, 12, 24, 9, 5, 7).unwrap();
        assert_eq!(SessionStamp::at(started).file_stamp(), "2023_12_24-09_05_07_AM");
    }
}
