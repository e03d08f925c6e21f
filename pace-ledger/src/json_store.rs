//! JSON file ledger: one document holding every user's records.
//!
//! Layout:
//! ```json
//! { "version": 1, "users": { "<user id>": { "month_config": {...}, "categories": [...],
//!   "income": [...], "saving_goals": [...], "contributions": [...] } } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pace_core::{
    CategoryTarget, DateRange, InMemoryLedger, IncomeEntry, LedgerAccess, MonthConfig,
    SavingContribution, SavingGoal,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;

pub const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerDocument {
    version: u32,
    #[serde(default)]
    users: InMemoryLedger,
}

/// A ledger loaded from, and saved back to, a JSON file
#[derive(Debug, Clone)]
pub struct JsonLedger {
    path: PathBuf,
    data: InMemoryLedger,
}

impl JsonLedger {
    /// Load `path`, or start empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "ledger file missing, starting empty");
            return Ok(Self {
                path,
                data: InMemoryLedger::new(),
            });
        }

        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let doc: LedgerDocument =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        if doc.version != LEDGER_VERSION {
            return Err(StoreError::UnsupportedVersion(doc.version));
        }

        info!(path = %path.display(), users = doc.users.user_ids().count(), "loaded ledger");
        Ok(Self {
            path,
            data: doc.users,
        })
    }

    /// Write the document back, replacing the file only once the new copy is complete.
    pub fn save(&self) -> Result<(), StoreError> {
        let doc = LedgerDocument {
            version: LEDGER_VERSION,
            users: self.data.clone(),
        };
        let json = serde_json::to_string_pretty(&doc).map_err(StoreError::Serialize)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "saved ledger");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.data
    }

    pub fn ledger_mut(&mut self) -> &mut InMemoryLedger {
        &mut self.data
    }
}

impl LedgerAccess for JsonLedger {
    fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryTarget>> {
        self.data.list_categories(user_id)
    }

    fn list_income_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<IncomeEntry>> {
        self.data.list_income_entries(user_id, range)
    }

    fn list_saving_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        self.data.list_saving_goals(user_id)
    }

    fn list_saving_contributions(
        &self,
        user_id: &str,
        goal_id: i64,
    ) -> Result<Vec<SavingContribution>> {
        self.data.list_saving_contributions(user_id, goal_id)
    }

    fn month_config(&self, user_id: &str) -> Result<Option<MonthConfig>> {
        self.data.month_config(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pace_core::CategoryKind;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pace-ledger-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("ledger.json")
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let ledger = JsonLedger::open(scratch_path("missing")).unwrap();
        assert_eq!(ledger.ledger().user_ids().count(), 0);
    }

    #[test]
    fn test_save_then_reopen() {
        let path = scratch_path("roundtrip");
        let mut ledger = JsonLedger::open(&path).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        ledger.ledger_mut().add_income("ana", date, 120.0).unwrap();
        ledger
            .ledger_mut()
            .add_category("ana", "Rent", CategoryKind::FixedAmount, 800.0)
            .unwrap();
        ledger.save().unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = JsonLedger::open(&path).unwrap();
        let range = DateRange::year(2024).unwrap();
        assert_eq!(reopened.list_income_entries("ana", range).unwrap().len(), 1);
        assert_eq!(reopened.list_categories("ana").unwrap()[0].name, "Rent");
    }

    #[test]
    fn test_rejects_unknown_version() {
        let path = scratch_path("version");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"version": 9, "users": {}}"#).unwrap();
        let err = JsonLedger::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = JsonLedger::open(&path).unwrap_err();
        assert!(err.to_string().contains("ledger.json"));
    }
}
