//! Ledger record types consumed by the engine.
//!
//! Every record is a plain value snapshot. The engine never mutates them;
//! only a ledger implementation does.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MIN_WORKING_DAYS: u32 = 22;
pub const MAX_WORKING_DAYS: u32 = 30;
pub const DEFAULT_WORKING_DAYS: u32 = 26;

/// Clamp a working-day count into `[22, 30]`.
pub fn clamp_working_days(days: i64) -> u32 {
    days.clamp(MIN_WORKING_DAYS as i64, MAX_WORKING_DAYS as i64) as u32
}

/// How a category's `value` is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// `value` is a monthly currency amount
    #[serde(rename = "fixed")]
    FixedAmount,
    /// `value` is percentage points (0-100) of total monthly income
    #[serde(rename = "percentage")]
    PercentageOfIncome,
}

/// A budget line the user wants their income to cover
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTarget {
    pub id: i64,
    pub name: String,
    pub kind: CategoryKind,
    pub value: f64,
}

impl CategoryTarget {
    pub fn fixed(id: i64, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CategoryKind::FixedAmount,
            value: amount,
        }
    }

    pub fn percentage(id: i64, name: impl Into<String>, percent: f64) -> Self {
        Self {
            id,
            name: name.into(),
            kind: CategoryKind::PercentageOfIncome,
            value: percent,
        }
    }

    /// Monthly amount, if this is a fixed category
    pub fn fixed_amount(&self) -> Option<f64> {
        match self.kind {
            CategoryKind::FixedAmount => Some(self.value),
            CategoryKind::PercentageOfIncome => None,
        }
    }

    /// Percentage points, if this is a percentage category
    pub fn percent(&self) -> Option<f64> {
        match self.kind {
            CategoryKind::PercentageOfIncome => Some(self.value),
            CategoryKind::FixedAmount => None,
        }
    }
}

/// One logged income amount. Entries sharing a date accumulate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IncomeEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

impl IncomeEntry {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SavingContribution {
    pub id: i64,
    pub goal_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Which month is being evaluated and over how many working days.
///
/// `working_days` is clamped to `[22, 30]` on construction and again on read,
/// so a hand-edited ledger can never push it out of range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthConfig {
    year: i32,
    month: u32,
    working_days: i64,
    /// Manually set yearly income goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annual_income_goal: Option<f64>,
    /// Manually set yearly savings goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annual_savings_goal: Option<f64>,
}

impl MonthConfig {
    pub fn new(year: i32, month: u32, working_days: i64) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
            working_days: clamp_working_days(working_days) as i64,
            annual_income_goal: None,
            annual_savings_goal: None,
        }
    }

    /// Config for the month containing `date`
    pub fn for_date(date: NaiveDate, working_days: i64) -> Self {
        Self::new(date.year(), date.month(), working_days)
    }

    pub fn with_annual_income_goal(mut self, goal: f64) -> Self {
        self.annual_income_goal = Some(goal);
        self
    }

    pub fn with_annual_savings_goal(mut self, goal: f64) -> Self {
        self.annual_savings_goal = Some(goal);
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month.clamp(1, 12)
    }

    pub fn working_days(&self) -> u32 {
        clamp_working_days(self.working_days)
    }

    /// The stored value, before clamping
    pub fn raw_working_days(&self) -> i64 {
        self.working_days
    }

    pub fn annual_income_goal(&self) -> Option<f64> {
        self.annual_income_goal
    }

    pub fn annual_savings_goal(&self) -> Option<f64> {
        self.annual_savings_goal
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// January 1st through December 31st of `year`
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
