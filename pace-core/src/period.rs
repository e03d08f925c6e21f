//! Calendar boundaries for the evaluated month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{DateRange, clamp_working_days};

/// Resolved view of one month relative to "today"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub year: i32,
    pub month: u32,
    pub working_days: u32,
    pub days_in_month: u32,
    /// `today.day` when today falls in the month, otherwise `working_days`
    pub elapsed_days: u32,
    /// `min(elapsed_days, working_days)`
    pub effective_day_index: u32,
    pub today: NaiveDate,
}

impl Period {
    /// Resolve `(year, month)` against `today`.
    ///
    /// Past and future months count as fully elapsed.
    pub fn resolve(year: i32, month: u32, today: NaiveDate, working_days: i64) -> Self {
        let month = month.clamp(1, 12);
        let clamped = clamp_working_days(working_days);
        if clamped as i64 != working_days {
            warn!(working_days, clamped, "working days out of range, clamping");
        }

        let today_in_month = today.year() == year && today.month() == month;
        let elapsed_days = if today_in_month { today.day() } else { clamped };

        Self {
            year,
            month,
            working_days: clamped,
            days_in_month: days_in_month(year, month),
            elapsed_days,
            effective_day_index: elapsed_days.min(clamped),
            today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn includes_today(&self) -> bool {
        self.contains(self.today)
    }

    pub fn range(&self) -> Option<DateRange> {
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let end = NaiveDate::from_ymd_opt(self.year, self.month, self.days_in_month)?;
        Some(DateRange::new(start, end))
    }
}

/// Number of calendar days in `(year, month)`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}
