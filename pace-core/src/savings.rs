//! Saving goal trajectory: accumulated amount, required pace, and coaching.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{SavingContribution, SavingGoal};

/// Three-way classification of a goal's trajectory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SavingStatus {
    /// Nothing contributed yet
    NeverStarted,
    /// Contributed less than the straight-line pace requires by today
    Behind,
    OnTrack,
}

impl SavingStatus {
    pub fn classify(contributed: f64, required_to_date: f64) -> Self {
        if contributed == 0.0 {
            SavingStatus::NeverStarted
        } else if contributed < required_to_date {
            SavingStatus::Behind
        } else {
            SavingStatus::OnTrack
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SavingStatus::NeverStarted => {
                "Consider a side activity to get your contributions started: small sales, extra jobs, and so on."
            }
            SavingStatus::Behind => {
                "You are below your planned savings. Review expenses, cut leaks and look for ways to raise your income."
            }
            SavingStatus::OnTrack => "Excellent, keep the discipline and leave these savings untouched.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingProgress {
    pub id: i64,
    pub name: String,
    pub target: f64,
    pub accumulated: f64,
    /// In `[0, 1]`, saturating on over-contribution
    pub progress_fraction: f64,
    pub total_days: i64,
    pub elapsed_days: i64,
    pub required_daily: f64,
    pub required_to_date: f64,
    /// Days left until the end date (negative once it has passed)
    pub days_remaining: i64,
    /// Daily amount that would still close the gap by the end date
    pub suggested_daily: f64,
    pub on_track: bool,
    pub status: SavingStatus,
    pub message: String,
}

/// Evaluate one goal as of `today`.
///
/// Only contributions whose `goal_id` matches are counted.
pub fn evaluate_goal(
    goal: &SavingGoal,
    contributions: &[SavingContribution],
    today: NaiveDate,
) -> SavingProgress {
    let total_days = ((goal.end_date - goal.start_date).num_days() + 1).max(1);
    let elapsed_days = ((today - goal.start_date).num_days() + 1).clamp(0, total_days);

    let required_daily = goal.target_amount / total_days as f64;
    let required_to_date = required_daily * elapsed_days as f64;

    let accumulated: f64 = contributions
        .iter()
        .filter(|c| c.goal_id == goal.id)
        .map(|c| c.amount)
        .fold(0.0, |acc, v| acc + v);

    let progress_fraction = if goal.target_amount > 0.0 {
        (accumulated / goal.target_amount).min(1.0)
    } else {
        0.0
    };

    let days_remaining = (goal.end_date - today).num_days();
    let suggested_daily = if days_remaining > 0 {
        ((goal.target_amount - accumulated) / days_remaining as f64).max(0.0)
    } else {
        0.0
    };

    let status = SavingStatus::classify(accumulated, required_to_date);

    SavingProgress {
        id: goal.id,
        name: goal.name.clone(),
        target: goal.target_amount,
        accumulated,
        progress_fraction,
        total_days,
        elapsed_days,
        required_daily,
        required_to_date,
        days_remaining,
        suggested_daily,
        on_track: accumulated >= required_to_date,
        status,
        message: status.message().to_string(),
    }
}
