//! Ledger access: the read-only seam between the engine and any storage backend.
//!
//! [`InMemoryLedger`] is the reference implementation. File-backed stores wrap
//! it (see `pace-ledger`), so lifecycle rules live in one place.

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    CategoryKind, CategoryTarget, DateRange, IncomeEntry, MonthConfig, SavingContribution,
    SavingGoal,
};

/// Most saving goals a single user may hold at once.
pub const MAX_SAVING_GOALS: usize = 5;

/// Read operations the engine needs for one user.
///
/// Implementations must only return records owned by `user_id` and must not
/// have side effects.
pub trait LedgerAccess {
    fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryTarget>>;
    fn list_income_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<IncomeEntry>>;
    fn list_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>>;
    fn list_saving_contributions(
        &self,
        user_id: &str,
        goal_id: i64,
    ) -> Result<Vec<SavingContribution>>;
    /// `None` when the user never configured a month
    fn month_config(&self, user_id: &str) -> Result<Option<MonthConfig>>;
}

impl<L: LedgerAccess + ?Sized> LedgerAccess for &L {
    fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryTarget>> {
        (**self).list_categories(user_id)
    }
    fn list_income_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<IncomeEntry>> {
        (**self).list_income_entries(user_id, range)
    }
    fn list_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        (**self).list_saving_goals(user_id)
    }
    fn list_saving_contributions(
        &self,
        user_id: &str,
        goal_id: i64,
    ) -> Result<Vec<SavingContribution>> {
        (**self).list_saving_contributions(user_id, goal_id)
    }
    fn month_config(&self, user_id: &str) -> Result<Option<MonthConfig>> {
        (**self).month_config(user_id)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown saving goal: {0}")]
    UnknownGoal(i64),
    #[error("unknown category: {0}")]
    UnknownCategory(i64),
    #[error("unknown saving contribution: {0}")]
    UnknownContribution(i64),
    #[error("saving goal limit reached ({limit} goals)")]
    GoalLimitReached { limit: usize },
    #[error("amount must be a finite, positive number (got {0})")]
    InvalidAmount(f64),
    #[error("amount must be a finite, non-negative number (got {0})")]
    NegativeAmount(f64),
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("name cannot be empty")]
    EmptyName,
}

/// All records owned by one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserLedger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_config: Option<MonthConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryTarget>,
    #[serde(default)]
    pub income: Vec<IncomeEntry>,
    #[serde(default)]
    pub saving_goals: Vec<SavingGoal>,
    #[serde(default)]
    pub contributions: Vec<SavingContribution>,
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn check_amount(amount: f64) -> Result<f64, LedgerError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

fn check_non_negative(amount: f64) -> Result<f64, LedgerError> {
    if amount.is_finite() && amount >= 0.0 {
        // Normalise -0.0
        Ok(amount + 0.0)
    } else {
        Err(LedgerError::NegativeAmount(amount))
    }
}

fn check_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        Err(LedgerError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

/// Users keyed by their opaque id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct InMemoryLedger {
    users: HashMap<String, UserLedger>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, user_id: &str) -> Option<&UserLedger> {
        self.users.get(user_id)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut UserLedger, LedgerError> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))
    }

    fn user_entry(&mut self, user_id: &str) -> &mut UserLedger {
        self.users.entry(user_id.to_string()).or_default()
    }

    /// Store the month configuration, clamping working days to `[22, 30]`.
    pub fn set_month_config(&mut self, user_id: &str, config: MonthConfig) {
        let mut clamped =
            MonthConfig::new(config.year(), config.month(), config.raw_working_days());
        if let Some(goal) = config.annual_income_goal() {
            clamped = clamped.with_annual_income_goal(goal);
        }
        if let Some(goal) = config.annual_savings_goal() {
            clamped = clamped.with_annual_savings_goal(goal);
        }
        self.user_entry(user_id).month_config = Some(clamped);
    }

    pub fn add_category(
        &mut self,
        user_id: &str,
        name: &str,
        kind: CategoryKind,
        value: f64,
    ) -> Result<i64, LedgerError> {
        let name = check_name(name)?;
        let value = check_non_negative(value)?;
        let user = self.user_entry(user_id);
        let id = next_id(user.categories.iter().map(|c| c.id));
        user.categories.push(CategoryTarget { id, name, kind, value });
        Ok(id)
    }

    /// Replace a category's name, kind and value, keeping its id.
    pub fn update_category(
        &mut self,
        user_id: &str,
        category_id: i64,
        name: &str,
        kind: CategoryKind,
        value: f64,
    ) -> Result<(), LedgerError> {
        let name = check_name(name)?;
        let value = check_non_negative(value)?;
        let category = self
            .user_mut(user_id)?
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(LedgerError::UnknownCategory(category_id))?;
        category.name = name;
        category.kind = kind;
        category.value = value;
        Ok(())
    }

    pub fn remove_category(&mut self, user_id: &str, category_id: i64) -> Result<(), LedgerError> {
        let user = self.user_mut(user_id)?;
        let before = user.categories.len();
        user.categories.retain(|c| c.id != category_id);
        if user.categories.len() == before {
            return Err(LedgerError::UnknownCategory(category_id));
        }
        Ok(())
    }

    pub fn add_income(
        &mut self,
        user_id: &str,
        date: NaiveDate,
        amount: f64,
    ) -> Result<(), LedgerError> {
        let amount = check_amount(amount)?;
        self.user_entry(user_id).income.push(IncomeEntry::new(date, amount));
        Ok(())
    }

    pub fn add_saving_goal(
        &mut self,
        user_id: &str,
        name: &str,
        target_amount: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i64, LedgerError> {
        let name = check_name(name)?;
        let target_amount = check_amount(target_amount)?;
        if end_date < start_date {
            return Err(LedgerError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let user = self.user_entry(user_id);
        if user.saving_goals.len() >= MAX_SAVING_GOALS {
            return Err(LedgerError::GoalLimitReached {
                limit: MAX_SAVING_GOALS,
            });
        }
        let id = next_id(user.saving_goals.iter().map(|g| g.id));
        user.saving_goals.push(SavingGoal {
            id,
            name,
            target_amount,
            start_date,
            end_date,
        });
        Ok(id)
    }

    /// Delete a goal together with all of its contributions.
    pub fn remove_saving_goal(&mut self, user_id: &str, goal_id: i64) -> Result<(), LedgerError> {
        let user = self.user_mut(user_id)?;
        let before = user.saving_goals.len();
        user.saving_goals.retain(|g| g.id != goal_id);
        if user.saving_goals.len() == before {
            return Err(LedgerError::UnknownGoal(goal_id));
        }
        user.contributions.retain(|c| c.goal_id != goal_id);
        Ok(())
    }

    pub fn add_contribution(
        &mut self,
        user_id: &str,
        goal_id: i64,
        date: NaiveDate,
        amount: f64,
    ) -> Result<i64, LedgerError> {
        let amount = check_non_negative(amount)?;
        let user = self.user_mut(user_id)?;
        if !user.saving_goals.iter().any(|g| g.id == goal_id) {
            return Err(LedgerError::UnknownGoal(goal_id));
        }
        let id = next_id(user.contributions.iter().map(|c| c.id));
        user.contributions.push(SavingContribution {
            id,
            goal_id,
            date,
            amount,
        });
        Ok(id)
    }

    /// Move a contribution to another date and amount; its goal stays the same.
    pub fn update_contribution(
        &mut self,
        user_id: &str,
        contribution_id: i64,
        date: NaiveDate,
        amount: f64,
    ) -> Result<(), LedgerError> {
        let amount = check_non_negative(amount)?;
        let contribution = self
            .user_mut(user_id)?
            .contributions
            .iter_mut()
            .find(|c| c.id == contribution_id)
            .ok_or(LedgerError::UnknownContribution(contribution_id))?;
        contribution.date = date;
        contribution.amount = amount;
        Ok(())
    }

    pub fn remove_contribution(
        &mut self,
        user_id: &str,
        contribution_id: i64,
    ) -> Result<(), LedgerError> {
        let user = self.user_mut(user_id)?;
        let before = user.contributions.len();
        user.contributions.retain(|c| c.id != contribution_id);
        if user.contributions.len() == before {
            return Err(LedgerError::UnknownContribution(contribution_id));
        }
        Ok(())
    }
}

impl LedgerAccess for InMemoryLedger {
    fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryTarget>> {
        Ok(self.user(user_id).map(|u| u.categories.clone()).unwrap_or_default())
    }

    fn list_income_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<IncomeEntry>> {
        Ok(self
            .user(user_id)
            .map(|u| {
                u.income
                    .iter()
                    .filter(|e| range.contains(e.date))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        Ok(self.user(user_id).map(|u| u.saving_goals.clone()).unwrap_or_default())
    }

    fn list_saving_contributions(
        &self,
        user_id: &str,
        goal_id: i64,
    ) -> Result<Vec<SavingContribution>> {
        Ok(self
            .user(user_id)
            .map(|u| {
                u.contributions
                    .iter()
                    .filter(|c| c.goal_id == goal_id)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn month_config(&self, user_id: &str) -> Result<Option<MonthConfig>> {
        Ok(self.user(user_id).and_then(|u| u.month_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_goal_limit() {
        let mut ledger = InMemoryLedger::new();
        for i in 0..MAX_SAVING_GOALS {
            ledger
                .add_saving_goal("ana", &format!("goal {i}"), 100.0, d(2024, 1, 1), d(2024, 6, 1))
                .unwrap();
        }
        let err = ledger
            .add_saving_goal("ana", "one too many", 100.0, d(2024, 1, 1), d(2024, 6, 1))
            .unwrap_err();
        assert_eq!(err, LedgerError::GoalLimitReached { limit: 5 });
    }

    #[test]
    fn test_remove_goal_cascades_contributions() {
        let mut ledger = InMemoryLedger::new();
        let bike = ledger
            .add_saving_goal("ana", "Bike", 300.0, d(2024, 1, 1), d(2024, 3, 1))
            .unwrap();
        let trip = ledger
            .add_saving_goal("ana", "Trip", 900.0, d(2024, 1, 1), d(2024, 9, 1))
            .unwrap();
        ledger.add_contribution("ana", bike, d(2024, 1, 2), 50.0).unwrap();
        ledger.add_contribution("ana", trip, d(2024, 1, 2), 70.0).unwrap();

        ledger.remove_saving_goal("ana", bike).unwrap();

        assert!(ledger.list_saving_contributions("ana", bike).unwrap().is_empty());
        assert_eq!(ledger.list_saving_contributions("ana", trip).unwrap().len(), 1);
        assert_eq!(ledger.list_saving_goals("ana").unwrap().len(), 1);
        assert_eq!(
            ledger.remove_saving_goal("ana", bike).unwrap_err(),
            LedgerError::UnknownGoal(bike)
        );
    }

    #[test]
    fn test_contribution_requires_existing_goal() {
        let mut ledger = InMemoryLedger::new();
        ledger
            .add_saving_goal("ana", "Bike", 300.0, d(2024, 1, 1), d(2024, 3, 1))
            .unwrap();
        assert_eq!(
            ledger.add_contribution("ana", 42, d(2024, 1, 2), 10.0).unwrap_err(),
            LedgerError::UnknownGoal(42)
        );
        assert_eq!(
            ledger.add_contribution("bob", 1, d(2024, 1, 2), 10.0).unwrap_err(),
            LedgerError::UnknownUser("bob".to_string())
        );
    }

    #[test]
    fn test_validation() {
        let mut ledger = InMemoryLedger::new();
        assert_eq!(
            ledger.add_income("ana", d(2024, 1, 2), -5.0).unwrap_err(),
            LedgerError::InvalidAmount(-5.0)
        );
        assert!(ledger.add_income("ana", d(2024, 1, 2), f64::NAN).is_err());
        assert_eq!(
            ledger
                .add_category("ana", "  ", CategoryKind::FixedAmount, 10.0)
                .unwrap_err(),
            LedgerError::EmptyName
        );
        assert!(matches!(
            ledger.add_saving_goal("ana", "Back to front", 10.0, d(2024, 2, 1), d(2024, 1, 1)),
            Err(LedgerError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_zero_allowed_for_contributions_and_categories() {
        let mut ledger = InMemoryLedger::new();
        let goal = ledger
            .add_saving_goal("ana", "Bike", 300.0, d(2024, 1, 1), d(2024, 3, 1))
            .unwrap();
        ledger.add_contribution("ana", goal, d(2024, 1, 2), 0.0).unwrap();
        ledger
            .add_category("ana", "Tithe", CategoryKind::PercentageOfIncome, 0.0)
            .unwrap();
        ledger
            .add_category("ana", "Gym", CategoryKind::FixedAmount, 0.0)
            .unwrap();

        assert_eq!(
            ledger.add_contribution("ana", goal, d(2024, 1, 2), -1.0).unwrap_err(),
            LedgerError::NegativeAmount(-1.0)
        );
        // Income and goal targets still need a positive amount
        assert_eq!(
            ledger.add_income("ana", d(2024, 1, 2), 0.0).unwrap_err(),
            LedgerError::InvalidAmount(0.0)
        );
        assert_eq!(
            ledger
                .add_saving_goal("ana", "Empty", 0.0, d(2024, 1, 1), d(2024, 3, 1))
                .unwrap_err(),
            LedgerError::InvalidAmount(0.0)
        );
    }

    #[test]
    fn test_update_category() {
        let mut ledger = InMemoryLedger::new();
        let id = ledger
            .add_category("ana", "Rent", CategoryKind::FixedAmount, 500.0)
            .unwrap();
        ledger
            .update_category("ana", id, " Savings ", CategoryKind::PercentageOfIncome, 15.0)
            .unwrap();
        assert_eq!(
            ledger.list_categories("ana").unwrap(),
            vec![CategoryTarget::percentage(id, "Savings", 15.0)]
        );
        assert_eq!(
            ledger
                .update_category("ana", 99, "X", CategoryKind::FixedAmount, 1.0)
                .unwrap_err(),
            LedgerError::UnknownCategory(99)
        );
        assert_eq!(
            ledger
                .update_category("ana", id, "", CategoryKind::FixedAmount, 1.0)
                .unwrap_err(),
            LedgerError::EmptyName
        );
    }

    #[test]
    fn test_update_and_remove_contribution() {
        let mut ledger = InMemoryLedger::new();
        let goal = ledger
            .add_saving_goal("ana", "Bike", 300.0, d(2024, 1, 1), d(2024, 3, 1))
            .unwrap();
        let first = ledger.add_contribution("ana", goal, d(2024, 1, 2), 50.0).unwrap();
        let second = ledger.add_contribution("ana", goal, d(2024, 1, 3), 20.0).unwrap();

        ledger
            .update_contribution("ana", first, d(2024, 1, 5), 75.0)
            .unwrap();
        let stored = ledger.list_saving_contributions("ana", goal).unwrap();
        assert_eq!(stored[0].date, d(2024, 1, 5));
        assert_eq!(stored[0].amount, 75.0);
        assert_eq!(stored[0].goal_id, goal);

        ledger.remove_contribution("ana", second).unwrap();
        assert_eq!(ledger.list_saving_contributions("ana", goal).unwrap().len(), 1);

        assert_eq!(
            ledger.remove_contribution("ana", second).unwrap_err(),
            LedgerError::UnknownContribution(second)
        );
        assert_eq!(
            ledger
                .update_contribution("ana", 42, d(2024, 1, 5), 1.0)
                .unwrap_err(),
            LedgerError::UnknownContribution(42)
        );
        assert_eq!(
            ledger.remove_contribution("bob", first).unwrap_err(),
            LedgerError::UnknownUser("bob".to_string())
        );
    }

    #[test]
    fn test_users_are_isolated() {
        let mut ledger = InMemoryLedger::new();
        ledger.add_income("ana", d(2024, 1, 2), 10.0).unwrap();
        ledger
            .add_category("ana", "Rent", CategoryKind::FixedAmount, 500.0)
            .unwrap();

        let range = DateRange::year(2024).unwrap();
        assert!(ledger.list_income_entries("bob", range).unwrap().is_empty());
        assert!(ledger.list_categories("bob").unwrap().is_empty());
        assert_eq!(ledger.list_income_entries("ana", range).unwrap().len(), 1);
    }

    #[test]
    fn test_income_range_filter() {
        let mut ledger = InMemoryLedger::new();
        ledger.add_income("ana", d(2023, 12, 31), 10.0).unwrap();
        ledger.add_income("ana", d(2024, 1, 1), 20.0).unwrap();
        let entries = ledger
            .list_income_entries("ana", DateRange::year(2024).unwrap())
            .unwrap();
        assert_eq!(entries, vec![IncomeEntry::new(d(2024, 1, 1), 20.0)]);
    }

    #[test]
    fn test_ids_and_category_removal() {
        let mut ledger = InMemoryLedger::new();
        let a = ledger
            .add_category("ana", "Rent", CategoryKind::FixedAmount, 500.0)
            .unwrap();
        let b = ledger
            .add_category("ana", "Tithe", CategoryKind::PercentageOfIncome, 10.0)
            .unwrap();
        assert_eq!((a, b), (1, 2));
        ledger.remove_category("ana", a).unwrap();
        assert_eq!(ledger.list_categories("ana").unwrap()[0].name, "Tithe");
        assert_eq!(
            ledger.remove_category("ana", a).unwrap_err(),
            LedgerError::UnknownCategory(a)
        );
    }

    #[test]
    fn test_month_config_clamped_on_write() {
        let mut ledger = InMemoryLedger::new();
        let raw: MonthConfig = serde_json::from_str(
            r#"{"year":2024,"month":1,"working_days":35,"annual_income_goal":12000.0}"#,
        )
        .unwrap();
        ledger.set_month_config("ana", raw);
        let stored = ledger.month_config("ana").unwrap().unwrap();
        assert_eq!(stored.raw_working_days(), 30);
        assert_eq!(stored.annual_income_goal(), Some(12000.0));
    }
}
