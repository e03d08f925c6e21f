use std::path::PathBuf;

use pace_core::LedgerError;

/// Failures of the file-backed ledger.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("reading {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing ledger {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serializing ledger")]
    Serialize(#[source] serde_json::Error),
    #[error("reading CSV {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("unsupported ledger version {0} (expected {})", crate::json_store::LEDGER_VERSION)]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
