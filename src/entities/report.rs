use serde::Serialize;
use tracing::debug;

use crate::entities::context::{ContextFlags, ContextWarning, context_warnings};
use crate::entities::log::{MAX_AGE, MIN_AGE};
use crate::entities::lookup::{
    MatchMode, MatchedRecord, NOT_FOUND_ADVISORY, match_selected, match_text, rank_by_hints,
};
use crate::entities::redflag::{RedFlag, scan_red_flags};
use crate::entities::symptom::SymptomTable;
use crate::error::SymptomRxError;

pub const DISCLAIMER: &str =
    "참고용 정보입니다. 정확한 진단과 처방은 꼭 의료 전문가와 상담하세요.";

#[derive(Debug, Clone)]
pub enum LookupInput {
    Text { input: String, mode: MatchMode },
    Selected(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub input: LookupInput,
    pub detail: Option<String>,
    pub age: Option<u32>,
    pub flags: ContextFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultPanel {
    #[serde(flatten)]
    pub matched: MatchedRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ContextWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchMode>,
    pub selected_symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub flags: ContextFlags,
    pub red_flags: Vec<RedFlag>,
    pub results: Vec<ResultPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<&'static str>,
}

impl LookupReport {
    pub fn warnings(&self) -> impl Iterator<Item = &ContextWarning> {
        self.results.iter().flat_map(|p| p.warnings.iter())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn lookup(
    table: &SymptomTable,
    request: LookupRequest,
) -> Result<LookupReport, SymptomRxError> {
    if let Some(age) = request.age
        && !(MIN_AGE..=MAX_AGE).contains(&age)
    {
        return Err(SymptomRxError::Validation(format!(
            "나이는 {MIN_AGE}~{MAX_AGE} 사이로 입력해 주세요."
        )));
    }
    let detail = non_blank(request.detail);

    let (query, mode, matches) = match request.input {
        LookupInput::Text { input, mode } => {
            let matches = match_text(table, &input, mode)?;
            (input, Some(mode), matches)
        }
        LookupInput::Selected(selected) => {
            let matches = match_selected(table, &selected)?;
            (selected.join(", "), None, matches)
        }
    };
    let matches = rank_by_hints(matches, detail.as_deref());

    let mut texts = vec![query.as_str()];
    if let Some(detail) = detail.as_deref() {
        texts.push(detail);
    }
    let red_flags = scan_red_flags(&texts);

    let results: Vec<ResultPanel> = matches
        .into_iter()
        .map(|matched| {
            let warnings = context_warnings(&matched.record, &request.flags);
            ResultPanel { matched, warnings }
        })
        .collect();
    debug!(
        results = results.len(),
        red_flags = red_flags.len(),
        "built lookup report"
    );

    Ok(LookupReport {
        selected_symptoms: results
            .iter()
            .map(|p| p.matched.record.symptom.clone())
            .collect(),
        advisory: results.is_empty().then_some(NOT_FOUND_ADVISORY),
        query,
        mode,
        detail,
        age: request.age,
        flags: request.flags,
        red_flags,
        results,
    })
}
