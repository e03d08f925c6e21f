//! pace-core: budget-vs-actual projection engine for personal income tracking

pub mod annual;
pub mod clock;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod model;
pub mod period;
pub mod progress;
pub mod savings;
pub mod targets;
pub mod tiers;

pub use annual::{AnnualGoals, AnnualProjection, MonthBucket, project_year};
pub use engine::{
    FinanceEngine, FinancialStateReport, UserSnapshot, build_report, compute_financial_state,
};
pub use error::EngineError;
pub use ledger::{InMemoryLedger, LedgerAccess, LedgerError, MAX_SAVING_GOALS, UserLedger};
pub use model::{
    CategoryKind, CategoryTarget, DateRange, IncomeEntry, MonthConfig, SavingContribution,
    SavingGoal, clamp_working_days,
};
pub use period::{Period, days_in_month};
pub use progress::{
    CategoryProgress, CategoryStatus, CumulativeSeries, DailyDistribution, DailyProgress,
    DayStatus, MonthStatus, MonthlyProgress,
};
pub use savings::{SavingProgress, SavingStatus, evaluate_goal};
pub use targets::{IncomeTargets, PERCENT_SHARE_CAP, compute_targets};
pub use tiers::{Tier, TierTable};
