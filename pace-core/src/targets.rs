//! Monthly and daily income targets derived from category definitions.
//!
//! Fixed categories are floors that must be covered; percentage categories
//! are a share of *total* income. Solving `income = fixed + share * income`
//! gives `income = fixed / (1 - share)`.

use serde::{Deserialize, Serialize};

use crate::model::{CategoryKind, CategoryTarget};

/// Ceiling on the summed percentage share, keeping `1 - share` well above zero.
pub const PERCENT_SHARE_CAP: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTargets {
    /// Sum of all fixed category amounts
    pub fixed_total: f64,
    /// Sum of percentage categories as a fraction, after the cap
    pub percent_share: f64,
    pub monthly_income_target: f64,
    pub daily_income_target: f64,
    pub working_days: u32,
}

impl IncomeTargets {
    /// False for the no-budget case (zero monthly target)
    pub fn is_configured(&self) -> bool {
        self.monthly_income_target > 0.0
    }
}

/// Derive income targets for a month of `working_days`.
pub fn compute_targets(categories: &[CategoryTarget], working_days: u32) -> IncomeTargets {
    let fixed_total: f64 = categories
        .iter()
        .filter(|c| c.kind == CategoryKind::FixedAmount)
        .map(|c| c.value)
        .fold(0.0, |acc, v| acc + v);

    let percent_share = (categories
        .iter()
        .filter(|c| c.kind == CategoryKind::PercentageOfIncome)
        .map(|c| c.value)
        .fold(0.0, |acc, v| acc + v)
        / 100.0)
        .min(PERCENT_SHARE_CAP);

    if fixed_total <= 0.0 && percent_share <= 0.0 {
        return IncomeTargets {
            working_days,
            ..IncomeTargets::default()
        };
    }

    let monthly_income_target = if percent_share < 1.0 {
        fixed_total / (1.0 - percent_share)
    } else {
        fixed_total
    };

    let daily_income_target = if working_days > 0 {
        monthly_income_target / working_days as f64
    } else {
        0.0
    };

    IncomeTargets {
        fixed_total,
        percent_share,
        monthly_income_target,
        daily_income_target,
        working_days,
    }
}
