//! Engine error type.

use std::error::Error as StdError;

/// Failures while computing a report.
///
/// Degenerate data (no categories, no income, no goals) is never an error;
/// only a failing ledger backend or an unrepresentable year is.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("ledger read `{operation}` failed for user {user_id}")]
    Ledger {
        operation: &'static str,
        user_id: String,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),
}

impl EngineError {
    pub(crate) fn ledger(operation: &'static str, user_id: &str, source: anyhow::Error) -> Self {
        EngineError::Ledger {
            operation,
            user_id: user_id.to_string(),
            source: source.into(),
        }
    }
}
