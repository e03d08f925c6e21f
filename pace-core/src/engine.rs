//! Financial state engine: ties the ledger to the evaluators.
//!
//! Flow: ledger reads → period → targets → progress + savings → annual.
//! [`build_report`] is the pure part and takes a value snapshot; the
//! [`FinanceEngine`] only gathers that snapshot from a [`LedgerAccess`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annual::{AnnualGoals, AnnualProjection, project_year};
use crate::error::EngineError;
use crate::ledger::LedgerAccess;
use crate::model::{
    CategoryTarget, DEFAULT_WORKING_DAYS, DateRange, IncomeEntry, MonthConfig, SavingContribution,
    SavingGoal,
};
use crate::period::Period;
use crate::progress::{
    CategoryProgress, DailyProgress, MonthlyProgress, evaluate_categories, evaluate_day,
    evaluate_month,
};
use crate::savings::{SavingProgress, evaluate_goal};
use crate::targets::{IncomeTargets, compute_targets};

/// Everything the engine reads for one user in one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSnapshot {
    pub month_config: Option<MonthConfig>,
    pub categories: Vec<CategoryTarget>,
    /// Income for at least the configured year
    pub income: Vec<IncomeEntry>,
    pub goals: Vec<(SavingGoal, Vec<SavingContribution>)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStateReport {
    pub user_id: String,
    pub as_of: NaiveDate,
    pub period: Period,
    pub targets: IncomeTargets,
    pub monthly: MonthlyProgress,
    pub daily: DailyProgress,
    pub categories: Vec<CategoryProgress>,
    pub savings: Vec<SavingProgress>,
    pub annual: AnnualProjection,
}

/// Compute the report from an already-gathered snapshot.
///
/// Without a month config, the month containing `as_of` is evaluated over
/// `default_working_days`.
pub fn build_report(
    user_id: &str,
    snapshot: &UserSnapshot,
    as_of: NaiveDate,
    default_working_days: i64,
) -> FinancialStateReport {
    let config = snapshot
        .month_config
        .unwrap_or_else(|| MonthConfig::for_date(as_of, default_working_days));

    let period = Period::resolve(config.year(), config.month(), as_of, config.raw_working_days());
    let targets = compute_targets(&snapshot.categories, period.working_days);

    let monthly = evaluate_month(&period, &targets, &snapshot.income);
    let daily = evaluate_day(&period, &targets, &snapshot.categories, &snapshot.income);
    let categories = evaluate_categories(&targets, &snapshot.categories, monthly.total_income);

    let savings: Vec<SavingProgress> = snapshot
        .goals
        .iter()
        .map(|(goal, contributions)| evaluate_goal(goal, contributions, as_of))
        .collect();

    let all_contributions: Vec<SavingContribution> = snapshot
        .goals
        .iter()
        .flat_map(|(_, contributions)| contributions.iter().copied())
        .collect();

    let annual = project_year(
        period.year,
        targets.monthly_income_target,
        monthly.projected_month_income,
        &snapshot.income,
        &all_contributions,
        AnnualGoals {
            income: config.annual_income_goal(),
            savings: config.annual_savings_goal(),
        },
    );

    debug!(
        user_id,
        year = period.year,
        month = period.month,
        monthly_target = targets.monthly_income_target,
        month_income = monthly.total_income,
        goals = savings.len(),
        "computed financial state"
    );

    FinancialStateReport {
        user_id: user_id.to_string(),
        as_of,
        period,
        targets,
        monthly,
        daily,
        categories,
        savings,
        annual,
    }
}

/// Computes reports against a ledger backend.
#[derive(Debug, Clone)]
pub struct FinanceEngine<L: LedgerAccess> {
    ledger: L,
    default_working_days: i64,
}

impl<L: LedgerAccess> FinanceEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            default_working_days: DEFAULT_WORKING_DAYS as i64,
        }
    }

    /// Working days used when the user has no month config
    pub fn with_default_working_days(mut self, days: i64) -> Self {
        self.default_working_days = days;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Read one user's records for the year containing their configured month.
    pub fn snapshot(&self, user_id: &str, as_of: NaiveDate) -> Result<UserSnapshot, EngineError> {
        let month_config = self
            .ledger
            .month_config(user_id)
            .map_err(|e| EngineError::ledger("month_config", user_id, e))?;

        let year = month_config.map(|c| c.year()).unwrap_or_else(|| as_of.year());
        let range = DateRange::year(year).ok_or(EngineError::YearOutOfRange(year))?;

        let categories = self
            .ledger
            .list_categories(user_id)
            .map_err(|e| EngineError::ledger("list_categories", user_id, e))?;

        let income = self
            .ledger
            .list_income_entries(user_id, range)
            .map_err(|e| EngineError::ledger("list_income_entries", user_id, e))?;

        let goals = self
            .ledger
            .list_saving_goals(user_id)
            .map_err(|e| EngineError::ledger("list_saving_goals", user_id, e))?
            .into_iter()
            .map(|goal| {
                let contributions = self
                    .ledger
                    .list_saving_contributions(user_id, goal.id)
                    .map_err(|e| EngineError::ledger("list_saving_contributions", user_id, e))?;
                Ok((goal, contributions))
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(UserSnapshot {
            month_config,
            categories,
            income,
            goals,
        })
    }

    pub fn compute_financial_state(
        &self,
        user_id: &str,
        as_of: NaiveDate,
    ) -> Result<FinancialStateReport, EngineError> {
        let snapshot = self.snapshot(user_id, as_of)?;
        Ok(build_report(user_id, &snapshot, as_of, self.default_working_days))
    }
}

/// One-shot convenience over [`FinanceEngine`] with default settings.
pub fn compute_financial_state<L: LedgerAccess>(
    ledger: L,
    user_id: &str,
    as_of: NaiveDate,
) -> Result<FinancialStateReport, EngineError> {
    FinanceEngine::new(ledger).compute_financial_state(user_id, as_of)
}
