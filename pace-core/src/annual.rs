//! Twelve-month income projection for the configured year.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::model::{IncomeEntry, SavingContribution};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// 1-based calendar month
    pub month: u32,
    pub ideal: f64,
    pub real: f64,
}

/// Manually set yearly goals, independent of the category budget
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnualGoals {
    pub income: Option<f64>,
    pub savings: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnualProjection {
    pub year: i32,
    /// Always twelve buckets, January first
    pub monthly_series: Vec<MonthBucket>,
    pub ideal_annual: f64,
    pub real_annual: f64,
    /// Current month's projected income extrapolated to twelve months
    pub projected_annual_income: f64,
    pub income_goal: Option<f64>,
    pub income_goal_ratio: f64,
    pub savings_goal: Option<f64>,
    pub savings_contributed: f64,
    pub savings_goal_ratio: f64,
}

/// Sum entries dated in `year` into calendar-month buckets.
pub fn bucket_by_month(year: i32, entries: &[IncomeEntry]) -> [f64; 12] {
    let mut buckets = [0.0; 12];
    for e in entries.iter().filter(|e| e.date.year() == year) {
        buckets[e.date.month0() as usize] += e.amount;
    }
    buckets
}

fn goal_ratio(actual: f64, goal: Option<f64>) -> f64 {
    match goal {
        Some(g) if g > 0.0 => actual / g,
        _ => 0.0,
    }
}

/// Build the yearly series.
///
/// `real_annual` is the sum of the twelve buckets, so it always agrees with
/// the series that gets charted.
pub fn project_year(
    year: i32,
    monthly_target: f64,
    projected_month_income: f64,
    entries: &[IncomeEntry],
    contributions: &[SavingContribution],
    goals: AnnualGoals,
) -> AnnualProjection {
    let buckets = bucket_by_month(year, entries);

    let monthly_series: Vec<MonthBucket> = buckets
        .iter()
        .enumerate()
        .map(|(i, real)| MonthBucket {
            month: i as u32 + 1,
            ideal: monthly_target,
            real: *real,
        })
        .collect();

    let real_annual: f64 = buckets.iter().copied().fold(0.0, |acc, v| acc + v);

    let savings_contributed: f64 = contributions
        .iter()
        .filter(|c| c.date.year() == year)
        .map(|c| c.amount)
        .fold(0.0, |acc, v| acc + v);

    AnnualProjection {
        year,
        monthly_series,
        ideal_annual: monthly_target * 12.0,
        real_annual,
        projected_annual_income: projected_month_income * 12.0,
        income_goal: goals.income,
        income_goal_ratio: goal_ratio(real_annual, goals.income),
        savings_goal: goals.savings,
        savings_contributed,
        savings_goal_ratio: goal_ratio(savings_contributed, goals.savings),
    }
}
