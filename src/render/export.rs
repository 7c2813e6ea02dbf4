//! Download payloads: a JSON summary of one lookup and a CSV of its drug rows.

use std::collections::HashSet;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::entities::report::LookupReport;
use crate::error::SymptomRxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub timestamp: String,
    pub selected_symptoms: Vec<String>,
    pub detail: Option<String>,
    pub matched_conditions: Vec<String>,
    pub matched_drugs: Vec<String>,
    pub alerts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DrugRow<'a> {
    symptom: &'a str,
    drug: &'a str,
    availability: &'a str,
    caution: &'a str,
    dose_note: &'a str,
}

fn dedup_in_order<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.as_str()) {
            out.push(item.clone());
        }
    }
    out
}

pub fn now_rfc3339() -> Result<String, SymptomRxError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

pub fn export_report(report: &LookupReport, timestamp: String) -> ExportReport {
    let records = || report.results.iter().map(|p| &p.matched.record);
    // 발열 and 열 can both match one input and carry the same warning text.
    let alerts: Vec<String> = report
        .red_flags
        .iter()
        .map(|f| f.alert.to_string())
        .chain(report.warnings().map(|w| w.message.to_string()))
        .collect();

    ExportReport {
        timestamp,
        selected_symptoms: report.selected_symptoms.clone(),
        detail: report.detail.clone(),
        matched_conditions: dedup_in_order(records().flat_map(|r| r.diseases.iter())),
        matched_drugs: dedup_in_order(records().flat_map(|r| r.drugs.iter())),
        alerts: dedup_in_order(alerts.iter()),
    }
}

/// One row per (matched record, drug), in result order.
pub fn drug_rows_csv(report: &LookupReport) -> Result<String, SymptomRxError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Header is written explicitly so an empty result still yields a valid file.
    writer.write_record(["symptom", "drug", "availability", "caution", "dose_note"])?;
    for record in report.results.iter().map(|p| &p.matched.record) {
        for drug in &record.drugs {
            writer.serialize(DrugRow {
                symptom: &record.symptom,
                drug,
                availability: record.availability.token(),
                caution: &record.caution,
                dose_note: record.dose_note.as_deref().unwrap_or(""),
            })?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| SymptomRxError::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|_| SymptomRxError::InvalidArgument("export CSV is not valid UTF-8".into()))
}
