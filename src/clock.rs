use chrono::{Local, NaiveDateTime};

use crate::allocation::TIMESTAMP_FORMAT;

/// Source of wall-clock time for booking records.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;

    /// Current time in the ledger's `YYYY-MM-DD HH:MM:SS` format.
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_timestamp_without_fraction() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 5)
            .unwrap()
            .and_hms_milli_opt(8, 3, 9, 450)
            .unwrap();
        assert_eq!(FixedClock::new(at).timestamp(), "2025-01-05 08:03:09");
    }

    #[test]
    fn system_clock_timestamp_parses_back() {
        let stamp = SystemClock.timestamp();
        assert!(NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_ok());
    }
}
