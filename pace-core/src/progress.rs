//! Progress of real income against targets: month, today, and per category.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::model::{CategoryKind, CategoryTarget, IncomeEntry};
use crate::period::Period;
use crate::targets::IncomeTargets;
use crate::tiers::{TierTable, tier};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MonthStatus {
    /// No monthly target could be derived
    Unconfigured,
    Risk,
    Tight,
    Comfortable,
    Growth,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Unconfigured,
    NoEntry,
    WellBelow,
    Below,
    Met,
    Exceeded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    FarBelow,
    Below,
    OnTrack,
    Above,
}

pub const MONTH_UNCONFIGURED_MESSAGE: &str = "No budget configured.";

pub const MONTH_TIERS: TierTable<MonthStatus> = TierTable::new(
    &[
        tier(
            0.7,
            MonthStatus::Risk,
            "Financial life at risk: well below the income level you need.",
        ),
        tier(
            1.0,
            MonthStatus::Tight,
            "Discomfort zone: you are below a healthy financial level.",
        ),
        tier(
            1.3,
            MonthStatus::Comfortable,
            "Comfort level: you are covering the base of your budget.",
        ),
    ],
    tier(
        f64::INFINITY,
        MonthStatus::Growth,
        "Growth zone: you are above the basic level, keep it up.",
    ),
);

pub const DAY_UNCONFIGURED_MESSAGE: &str =
    "Set up your categories and working days to compute a daily target.";
pub const DAY_NO_ENTRY_MESSAGE: &str = "No income recorded for today yet.";

pub const DAY_TIERS: TierTable<DayStatus> = TierTable::new(
    &[
        tier(
            0.7,
            DayStatus::WellBelow,
            "Today's income is well below your ideal level. Consider an extra activity or review expenses.",
        ),
        tier(
            1.0,
            DayStatus::Below,
            "Today's income is somewhat below the ideal level. A better day tomorrow can make up for it.",
        ),
        tier(
            1.4,
            DayStatus::Met,
            "Well done: you met or beat your daily income target.",
        ),
    ],
    tier(
        f64::INFINITY,
        DayStatus::Exceeded,
        "Excellent day: you far exceeded your daily target. A good moment to boost savings or investment.",
    ),
);

pub const CATEGORY_TIERS: TierTable<CategoryStatus> = TierTable::new(
    &[
        tier(0.5, CategoryStatus::FarBelow, "Far below"),
        tier(0.9, CategoryStatus::Below, "Somewhat low"),
        tier(1.1, CategoryStatus::OnTrack, "Within expectations"),
    ],
    tier(f64::INFINITY, CategoryStatus::Above, "Above (good)"),
);

/// Planned vs actual cumulative income, one point per working day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSeries {
    pub days: Vec<u32>,
    pub planned: Vec<f64>,
    pub actual: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    pub total_income: f64,
    pub expected_to_date: f64,
    pub avg_daily_real: f64,
    /// Income so far against what should have come in by today
    pub pace_ratio: f64,
    pub projected_month_income: f64,
    pub ratio: f64,
    pub status: MonthStatus,
    pub message: String,
    pub series: CumulativeSeries,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionLine {
    pub id: i64,
    pub name: String,
    pub kind: CategoryKind,
    pub ideal_daily: f64,
    pub recommended_today: f64,
}

/// How today's income should be split across categories
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyDistribution {
    pub lines: Vec<DistributionLine>,
    pub total_ideal: f64,
    pub total_recommended: f64,
    pub available_ideal: f64,
    pub available_real: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub today_income: f64,
    pub ratio: f64,
    pub status: DayStatus,
    pub message: String,
    pub distribution: DailyDistribution,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub id: i64,
    pub name: String,
    pub kind: CategoryKind,
    /// Percentage points, for percentage categories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    pub target: f64,
    pub real: f64,
    pub ratio: f64,
    pub status: CategoryStatus,
    pub label: String,
    pub daily_suggested: f64,
}

fn safe_ratio(actual: f64, target: f64) -> f64 {
    if target > 0.0 { actual / target } else { 0.0 }
}

/// Sum of entries dated inside the period
pub fn month_income(period: &Period, entries: &[IncomeEntry]) -> f64 {
    entries
        .iter()
        .filter(|e| period.contains(e.date))
        .map(|e| e.amount)
        .fold(0.0, |acc, v| acc + v)
}

/// Sum of entries dated exactly today; zero when today lies outside the period
pub fn today_income(period: &Period, entries: &[IncomeEntry]) -> f64 {
    if !period.includes_today() {
        return 0.0;
    }
    entries
        .iter()
        .filter(|e| e.date == period.today)
        .map(|e| e.amount)
        .fold(0.0, |acc, v| acc + v)
}

pub fn evaluate_month(
    period: &Period,
    targets: &IncomeTargets,
    entries: &[IncomeEntry],
) -> MonthlyProgress {
    let total_income = month_income(period, entries);
    let day_index = period.effective_day_index;

    let expected_to_date = targets.daily_income_target * day_index as f64;
    let avg_daily_real = total_income / day_index.max(1) as f64;

    let (ratio, status, message) = if targets.monthly_income_target <= 0.0 {
        (0.0, MonthStatus::Unconfigured, MONTH_UNCONFIGURED_MESSAGE)
    } else {
        let r = total_income / targets.monthly_income_target;
        let t = MONTH_TIERS.classify(r);
        (r, t.status, t.message)
    };

    MonthlyProgress {
        total_income,
        expected_to_date,
        avg_daily_real,
        pace_ratio: safe_ratio(total_income, expected_to_date),
        projected_month_income: avg_daily_real * period.working_days as f64,
        ratio,
        status,
        message: message.to_string(),
        series: cumulative_series(period, targets, entries),
    }
}

pub fn evaluate_day(
    period: &Period,
    targets: &IncomeTargets,
    categories: &[CategoryTarget],
    entries: &[IncomeEntry],
) -> DailyProgress {
    let today_income = today_income(period, entries);
    let daily_target = targets.daily_income_target;

    let (ratio, status, message) = if daily_target <= 0.0 {
        (0.0, DayStatus::Unconfigured, DAY_UNCONFIGURED_MESSAGE)
    } else if today_income <= 0.0 {
        (0.0, DayStatus::NoEntry, DAY_NO_ENTRY_MESSAGE)
    } else {
        let r = today_income / daily_target;
        let t = DAY_TIERS.classify(r);
        (r, t.status, t.message)
    };

    DailyProgress {
        today_income,
        ratio,
        status,
        message: message.to_string(),
        distribution: daily_distribution(targets, categories, today_income),
    }
}

/// Split today's income across categories in the proportions the budget implies.
pub fn daily_distribution(
    targets: &IncomeTargets,
    categories: &[CategoryTarget],
    today_income: f64,
) -> DailyDistribution {
    let daily_target = targets.daily_income_target;
    let working_days = targets.working_days;

    let lines: Vec<DistributionLine> = categories
        .iter()
        .map(|c| {
            let (ideal_daily, recommended_today) = match c.kind {
                CategoryKind::FixedAmount => {
                    let ideal = if working_days > 0 {
                        c.value / working_days as f64
                    } else {
                        0.0
                    };
                    let recommended = if daily_target > 0.0 && today_income > 0.0 {
                        ideal / daily_target * today_income
                    } else {
                        0.0
                    };
                    (ideal, recommended)
                }
                CategoryKind::PercentageOfIncome => {
                    let share = c.value / 100.0;
                    (
                        if daily_target > 0.0 { daily_target * share } else { 0.0 },
                        if today_income > 0.0 { today_income * share } else { 0.0 },
                    )
                }
            };
            DistributionLine {
                id: c.id,
                name: c.name.clone(),
                kind: c.kind,
                ideal_daily,
                recommended_today,
            }
        })
        .collect();

    let total_ideal = lines.iter().fold(0.0, |acc, l| acc + l.ideal_daily);
    let total_recommended = lines.iter().fold(0.0, |acc, l| acc + l.recommended_today);

    DailyDistribution {
        lines,
        total_ideal,
        total_recommended,
        available_ideal: daily_target - total_ideal,
        available_real: today_income - total_recommended,
    }
}

/// Per-category health for the month.
///
/// Fixed categories are credited in proportion to overall income attainment,
/// capped at their target. Percentage categories take their share of real income.
pub fn evaluate_categories(
    targets: &IncomeTargets,
    categories: &[CategoryTarget],
    month_income_real: f64,
) -> Vec<CategoryProgress> {
    let monthly_target = targets.monthly_income_target;

    categories
        .iter()
        .map(|c| {
            let (target, real, percent) = match c.kind {
                CategoryKind::FixedAmount => {
                    let real = if monthly_target > 0.0 && month_income_real > 0.0 {
                        c.value * (month_income_real / monthly_target).min(1.0)
                    } else {
                        0.0
                    };
                    (c.value, real, None)
                }
                CategoryKind::PercentageOfIncome => {
                    let share = c.value / 100.0;
                    (monthly_target * share, month_income_real * share, Some(c.value))
                }
            };

            let r = safe_ratio(real, target);
            let t = CATEGORY_TIERS.classify(r);
            let daily_suggested = if targets.working_days > 0 {
                target / targets.working_days as f64
            } else {
                0.0
            };

            CategoryProgress {
                id: c.id,
                name: c.name.clone(),
                kind: c.kind,
                percent,
                target,
                real,
                ratio: r,
                status: t.status,
                label: t.message.to_string(),
                daily_suggested,
            }
        })
        .collect()
}

/// Day-by-day cumulative planned and actual income over `1..=working_days`.
///
/// Days without entries repeat the prior actual value. Entries dated after
/// the last working day never enter the series.
pub fn cumulative_series(
    period: &Period,
    targets: &IncomeTargets,
    entries: &[IncomeEntry],
) -> CumulativeSeries {
    let mut by_day: BTreeMap<u32, f64> = BTreeMap::new();
    for e in entries.iter().filter(|e| period.contains(e.date)) {
        *by_day.entry(e.date.day()).or_insert(0.0) += e.amount;
    }

    let mut series = CumulativeSeries::default();
    let mut running = 0.0;
    for day in 1..=period.working_days {
        running += by_day.get(&day).copied().unwrap_or(0.0);
        series.days.push(day);
        series.planned.push(targets.daily_income_target * day as f64);
        series.actual.push(running);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::compute_targets;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn budget() -> Vec<CategoryTarget> {
        vec![
            CategoryTarget::fixed(1, "Rent", 800.0),
            CategoryTarget::percentage(2, "Savings", 20.0),
        ]
    }

    fn setup(today: NaiveDate) -> (Period, IncomeTargets) {
        let period = Period::resolve(2024, 1, today, 25);
        let targets = compute_targets(&budget(), period.working_days);
        (period, targets)
    }

    #[test]
    fn test_zero_income_with_target_is_risk_not_unconfigured() {
        let (period, targets) = setup(d(2024, 1, 10));
        let m = evaluate_month(&period, &targets, &[]);
        assert_eq!(m.ratio, 0.0);
        assert_eq!(m.status, MonthStatus::Risk);
        assert_eq!(m.message, MONTH_TIERS.tiers()[0].message);
    }

    #[test]
    fn test_no_budget_is_unconfigured() {
        let period = Period::resolve(2024, 1, d(2024, 1, 10), 26);
        let targets = compute_targets(&[], 26);
        let entries = vec![IncomeEntry::new(d(2024, 1, 3), 50.0)];
        let m = evaluate_month(&period, &targets, &entries);
        assert_eq!(m.status, MonthStatus::Unconfigured);
        assert_eq!(m.message, MONTH_UNCONFIGURED_MESSAGE);
        assert_eq!(m.total_income, 50.0);

        let day = evaluate_day(&period, &targets, &[], &entries);
        assert_eq!(day.status, DayStatus::Unconfigured);
    }

    #[test]
    fn test_month_tiers() {
        let (period, targets) = setup(d(2024, 1, 10));
        let cases = [
            (699.0, MonthStatus::Risk),
            (700.0, MonthStatus::Tight),
            (999.0, MonthStatus::Tight),
            (1000.0, MonthStatus::Comfortable),
            (1299.0, MonthStatus::Comfortable),
            (1300.0, MonthStatus::Growth),
        ];
        for (amount, expected) in cases {
            let entries = vec![IncomeEntry::new(d(2024, 1, 2), amount)];
            assert_eq!(evaluate_month(&period, &targets, &entries).status, expected, "{amount}");
        }
    }

    #[test]
    fn test_month_pacing_figures() {
        let (period, targets) = setup(d(2024, 1, 10));
        let entries = vec![
            IncomeEntry::new(d(2024, 1, 2), 200.0),
            IncomeEntry::new(d(2024, 1, 9), 200.0),
            // Outside the month: ignored
            IncomeEntry::new(d(2023, 12, 31), 999.0),
        ];
        let m = evaluate_month(&period, &targets, &entries);
        assert!(approx(m.total_income, 400.0));
        // daily target = 1000 / 25 = 40
        assert!(approx(m.expected_to_date, 400.0));
        assert!(approx(m.pace_ratio, 1.0));
        assert!(approx(m.avg_daily_real, 40.0));
        assert!(approx(m.projected_month_income, 1000.0));
    }

    #[test]
    fn test_day_tiers_and_no_entry() {
        let (period, targets) = setup(d(2024, 1, 10));
        // daily target 40
        let none = evaluate_day(&period, &targets, &budget(), &[]);
        assert_eq!(none.status, DayStatus::NoEntry);
        assert_eq!(none.message, DAY_NO_ENTRY_MESSAGE);

        let cases = [
            (27.0, DayStatus::WellBelow),
            (28.0, DayStatus::Below),
            (40.0, DayStatus::Met),
            (55.9, DayStatus::Met),
            (56.0, DayStatus::Exceeded),
        ];
        for (amount, expected) in cases {
            let entries = vec![IncomeEntry::new(d(2024, 1, 10), amount)];
            let day = evaluate_day(&period, &targets, &budget(), &entries);
            assert_eq!(day.status, expected, "{amount}");
        }
    }

    #[test]
    fn test_today_outside_period_counts_nothing() {
        let period = Period::resolve(2024, 1, d(2024, 2, 1), 25);
        let entries = vec![IncomeEntry::new(d(2024, 2, 1), 90.0)];
        assert_eq!(today_income(&period, &entries), 0.0);
    }

    #[test]
    fn test_same_day_entries_accumulate() {
        let (period, _) = setup(d(2024, 1, 10));
        let entries = vec![
            IncomeEntry::new(d(2024, 1, 10), 15.0),
            IncomeEntry::new(d(2024, 1, 10), 25.0),
        ];
        assert!(approx(today_income(&period, &entries), 40.0));
    }

    #[test]
    fn test_category_attribution() {
        let (_, targets) = setup(d(2024, 1, 10));
        let cats = evaluate_categories(&targets, &budget(), 500.0);

        // Fixed: 800 * min(1, 500/1000)
        let rent = &cats[0];
        assert!(approx(rent.target, 800.0));
        assert!(approx(rent.real, 400.0));
        assert!(approx(rent.ratio, 0.5));
        assert_eq!(rent.status, CategoryStatus::Below);
        assert!(approx(rent.daily_suggested, 32.0));

        // Percentage: target 1000 * 0.2, real 500 * 0.2
        let savings = &cats[1];
        assert!(approx(savings.target, 200.0));
        assert!(approx(savings.real, 100.0));
        assert_eq!(savings.percent, Some(20.0));
        assert_eq!(savings.status, CategoryStatus::Below);
    }

    #[test]
    fn test_fixed_category_capped_at_target() {
        let (_, targets) = setup(d(2024, 1, 10));
        let cats = evaluate_categories(&targets, &budget(), 2500.0);
        assert!(approx(cats[0].real, 800.0));
        assert_eq!(cats[0].status, CategoryStatus::OnTrack);
        // 2500 * 0.2 = 500 against 200
        assert_eq!(cats[1].status, CategoryStatus::Above);
    }

    #[test]
    fn test_category_tiers_when_unconfigured() {
        let targets = compute_targets(&[], 26);
        let cats = evaluate_categories(
            &targets,
            &[CategoryTarget::percentage(1, "Tithe", 10.0)],
            300.0,
        );
        assert_eq!(cats[0].target, 0.0);
        assert_eq!(cats[0].ratio, 0.0);
        assert_eq!(cats[0].status, CategoryStatus::FarBelow);
    }

    #[test]
    fn test_cumulative_series() {
        let (period, targets) = setup(d(2024, 1, 10));
        let entries = vec![
            IncomeEntry::new(d(2024, 1, 3), 30.0),
            IncomeEntry::new(d(2024, 1, 1), 10.0),
            IncomeEntry::new(d(2024, 1, 3), 5.0),
            // Past the 25th working day
            IncomeEntry::new(d(2024, 1, 28), 100.0),
        ];
        let s = cumulative_series(&period, &targets, &entries);
        assert_eq!(s.days.len(), 25);
        assert_eq!(s.days[0], 1);
        assert!(approx(s.planned[24], 1000.0));
        assert_eq!(s.actual[0], 10.0);
        assert_eq!(s.actual[1], 10.0);
        assert_eq!(s.actual[2], 45.0);
        assert_eq!(s.actual[24], 45.0);
    }

    #[test]
    fn test_daily_distribution() {
        let (_, targets) = setup(d(2024, 1, 10));
        // daily target 40; rent ideal 800/25 = 32, savings ideal 40 * 0.2 = 8
        let dist = daily_distribution(&targets, &budget(), 20.0);
        assert!(approx(dist.lines[0].ideal_daily, 32.0));
        assert!(approx(dist.lines[0].recommended_today, 16.0));
        assert!(approx(dist.lines[1].ideal_daily, 8.0));
        assert!(approx(dist.lines[1].recommended_today, 4.0));
        assert!(approx(dist.total_ideal, 40.0));
        assert!(approx(dist.available_ideal, 0.0));
        assert!(approx(dist.available_real, 0.0));

        let idle = daily_distribution(&targets, &budget(), 0.0);
        assert_eq!(idle.total_recommended, 0.0);
    }
}
