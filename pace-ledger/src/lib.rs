//! pace-ledger: JSON file ledger and CSV income import feeding pace-core

pub mod error;
pub mod income_csv;
pub mod json_store;

pub use error::StoreError;
pub use income_csv::{ImportSummary, ParsedIncome, import_income_csv, parse_income_csv};
pub use json_store::{JsonLedger, LEDGER_VERSION};
