use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::symptom::{SymptomRecord, SymptomTable};
use crate::error::SymptomRxError;

pub const NOT_FOUND_ADVISORY: &str =
    "해당 증상에 대한 정보가 없어요. 꼭 의료 전문가와 상담해 주세요.";
pub const EMPTY_INPUT_PROMPT: &str = "증상을 입력해 주세요.";
pub const EMPTY_SELECTION_PROMPT: &str = "증상을 최소 1개 이상 선택해 주세요.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Key appears anywhere in the input
    #[default]
    Substring,
    /// Input equals the key
    Exact,
    /// Key equals one whitespace/comma-delimited token (or phrase for multi-word keys)
    Token,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Exact => "exact",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = SymptomRxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            "token" => Ok(Self::Token),
            other => Err(SymptomRxError::InvalidArgument(format!(
                "unknown match mode '{other}' (expected substring, exact, or token)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedRecord {
    #[serde(flatten)]
    pub record: SymptomRecord,
    pub score: u32,
}

fn tokens(input: &str) -> Vec<&str> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn token_match(key: &str, toks: &[&str]) -> bool {
    let key_toks = tokens(key);
    match key_toks.len() {
        0 => false,
        1 => toks.contains(&key_toks[0]),
        n => toks.windows(n).any(|w| w == key_toks.as_slice()),
    }
}

fn is_match(key: &str, input: &str, toks: &[&str], mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => input.contains(key),
        MatchMode::Exact => input == key,
        MatchMode::Token => token_match(key, toks),
    }
}

/// Free-text lookup. Every table key that matches contributes its record, in table order.
///
/// The input is not trimmed or case-folded; only a blank input is rejected.
pub fn match_text(
    table: &SymptomTable,
    input: &str,
    mode: MatchMode,
) -> Result<Vec<MatchedRecord>, SymptomRxError> {
    if input.trim().is_empty() {
        return Err(SymptomRxError::Validation(EMPTY_INPUT_PROMPT.into()));
    }

    let toks = tokens(input);
    let matches: Vec<MatchedRecord> = table
        .records()
        .iter()
        .filter(|r| is_match(&r.symptom, input, &toks, mode))
        .map(|r| MatchedRecord {
            record: r.clone(),
            score: 1,
        })
        .collect();
    debug!(mode = %mode, matched = matches.len(), "matched free-text input");
    Ok(matches)
}

/// Multi-select lookup: each key must exist exactly. Selection order is kept and
/// repeated keys collapse to their first occurrence.
pub fn match_selected(
    table: &SymptomTable,
    selected: &[String],
) -> Result<Vec<MatchedRecord>, SymptomRxError> {
    if selected.is_empty() {
        return Err(SymptomRxError::Validation(EMPTY_SELECTION_PROMPT.into()));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(selected.len());
    for key in selected {
        if !seen.insert(key.as_str()) {
            continue;
        }
        let Some(record) = table.get(key) else {
            return Err(SymptomRxError::NotFound {
                entity: "symptom".into(),
                id: key.clone(),
                suggestion: "Try: symptomrx list".into(),
            });
        };
        out.push(MatchedRecord {
            record: record.clone(),
            score: 1,
        });
    }
    Ok(out)
}

/// Score = 1 + number of the record's hints found in `detail`. Stable, so ties keep
/// their previous order.
pub fn rank_by_hints(
    mut matches: Vec<MatchedRecord>,
    detail: Option<&str>,
) -> Vec<MatchedRecord> {
    let Some(detail) = detail.filter(|d| !d.trim().is_empty()) else {
        return matches;
    };
    for m in &mut matches {
        let hits = m
            .record
            .hints
            .iter()
            .filter(|h| !h.is_empty() && detail.contains(h.as_str()))
            .count();
        m.score = 1 + hits as u32;
    }
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
