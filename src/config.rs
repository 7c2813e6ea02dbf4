//! Runtime settings resolved from flags first, then environment variables.

use std::path::PathBuf;

use crate::entities::lookup::MatchMode;
use crate::error::SymptomRxError;
use crate::utils::paths::default_log_path;

pub const TABLE_ENV: &str = "SYMPTOMRX_TABLE";
pub const LOG_ENV: &str = "SYMPTOMRX_LOG";
pub const MATCH_ENV: &str = "SYMPTOMRX_MATCH";

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// CSV table override; `None` selects the built-in table.
pub fn table_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| env_value(TABLE_ENV).map(PathBuf::from))
}

pub fn log_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env_value(LOG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_log_path)
}

pub fn match_mode(flag: Option<MatchMode>) -> Result<MatchMode, SymptomRxError> {
    if let Some(mode) = flag {
        return Ok(mode);
    }
    match env_value(MATCH_ENV) {
        Some(raw) => raw.parse(),
        None => Ok(MatchMode::default()),
    }
}
