//! Forecast issue-time selection.
//!
//! The upstream publishes a new forecast batch at fixed local hours; a
//! request must reference the most recent published slot or the API
//! answers NO_DATA.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// Local hours at which the KMA issues village forecasts.
const ISSUE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// A concrete forecast publication slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueSlot {
    pub date: NaiveDate,
    pub hour: u32,
}

impl IssueSlot {
    /// Most recent slot issued at or before `now`.
    ///
    /// Before the day's first slot (02:00) the previous day's 23:00 batch
    /// is the latest available.
    pub fn for_datetime(now: NaiveDateTime) -> Self {
        let hour = now.hour();
        match ISSUE_HOURS.iter().rev().find(|&&h| h <= hour) {
            Some(&h) => Self {
                date: now.date(),
                hour: h,
            },
            None => Self {
                date: now.date() - Duration::days(1),
                hour: 23,
            },
        }
    }

    /// `base_date` request parameter (`yyyyMMdd`).
    pub fn base_date(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// `base_time` request parameter (`HHmm`).
    pub fn base_time(&self) -> String {
        format!("{:02}00", self.hour)
    }
}
