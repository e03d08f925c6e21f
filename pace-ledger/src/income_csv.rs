//! Import income entries from bank-export CSVs.
//!
//! Expected columns: `date,amount[,...]`. A header row is optional. Dates may
//! be `YYYY-MM-DD` or `MM/DD/YYYY`; amounts may carry `$` and thousands commas.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use pace_core::{InMemoryLedger, IncomeEntry};
use tracing::warn;

use crate::error::StoreError;

/// Entries parsed from one CSV, plus how many rows were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIncome {
    pub entries: Vec<IncomeEntry>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

/// A first cell with no digits is a column title, not a mistyped date
fn looks_like_header(cell: &str) -> bool {
    !cell.chars().any(|c| c.is_ascii_digit())
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|a| a.is_finite())
}

/// Parse CSV rows from any reader.
pub fn parse_income_reader<R: Read>(reader: R) -> Result<ParsedIncome, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedIncome::default();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let date_str = record.get(0).unwrap_or("");
        if date_str.is_empty() {
            continue;
        }

        let Some(date) = parse_date(date_str) else {
            if row == 0 && looks_like_header(date_str) {
                continue;
            }
            warn!(row = row + 1, value = date_str, "skipping row with unparseable date");
            parsed.skipped += 1;
            continue;
        };

        match record.get(1).and_then(parse_amount) {
            Some(amount) if amount > 0.0 => parsed.entries.push(IncomeEntry::new(date, amount)),
            other => {
                warn!(row = row + 1, amount = ?other, "skipping row without a positive amount");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Parse a CSV file of income entries.
pub fn parse_income_csv(path: impl AsRef<Path>) -> Result<ParsedIncome, StoreError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_income_reader(file).map_err(|source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `path` and append every valid entry to `user_id`'s income.
pub fn import_income_csv(
    ledger: &mut InMemoryLedger,
    user_id: &str,
    path: impl AsRef<Path>,
) -> Result<ImportSummary, StoreError> {
    let parsed = parse_income_csv(path)?;
    for entry in &parsed.entries {
        ledger.add_income(user_id, entry.date, entry.amount)?;
    }
    Ok(ImportSummary {
        imported: parsed.entries.len(),
        skipped: parsed.skipped,
    })
}
