use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$PACE_HOME`, or `~/.pace`
pub fn pace_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PACE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pace"))
}

pub fn ensure_pace_home() -> Result<PathBuf> {
    let dir = pace_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_ledger_path() -> Result<PathBuf> {
    Ok(pace_home()?.join("ledger.json"))
}
