use std::path::Path;
use std::sync::OnceLock;

use minijinja::{Environment, context};

use crate::entities::log::LogEntry;
use crate::entities::report::{DISCLAIMER, LookupReport};
use crate::entities::symptom::SymptomTable;
use crate::error::SymptomRxError;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(serde::Serialize)]
struct PanelView<'a> {
    symptom: &'a str,
    score: u32,
    diseases: &'a [String],
    drugs: &'a [String],
    availability: &'static str,
    otc: bool,
    caution: &'a str,
    dose_note: Option<&'a str>,
    image_url: Option<&'a str>,
    warnings: Vec<&'static str>,
}

#[derive(serde::Serialize)]
struct TableRow<'a> {
    symptom: &'a str,
    diseases: &'a [String],
    availability: &'static str,
}

fn env() -> Result<&'static Environment<'static>, SymptomRxError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_filter("truncate", |s: String, max_bytes: usize| -> String {
        if s.len() <= max_bytes {
            return s;
        }
        if max_bytes == 0 {
            return "…".to_string();
        }
        let mut boundary = max_bytes;
        while boundary > 0 && !s.is_char_boundary(boundary) {
            boundary -= 1;
        }
        let mut out = s[..boundary].trim_end().to_string();
        out.push('…');
        out
    });
    // Table cells: `|` would end the cell and a newline would end the row.
    env.add_filter("md_cell", |s: String| -> String {
        s.replace('|', "\\|").replace(['\r', '\n'], " ")
    });
    env.add_template("lookup.md.j2", include_str!("../../templates/lookup.md.j2"))?;
    env.add_template("table.md.j2", include_str!("../../templates/table.md.j2"))?;
    env.add_template("log.md.j2", include_str!("../../templates/log.md.j2"))?;

    let _ = ENV.set(env);
    ENV.get().ok_or_else(|| {
        SymptomRxError::InvalidArgument("template environment initialization race".into())
    })
}

pub fn lookup_markdown(report: &LookupReport) -> Result<String, SymptomRxError> {
    let tmpl = env()?.get_template("lookup.md.j2")?;
    let results: Vec<PanelView<'_>> = report
        .results
        .iter()
        .map(|panel| {
            let record = &panel.matched.record;
            PanelView {
                symptom: &record.symptom,
                score: panel.matched.score,
                diseases: &record.diseases,
                drugs: &record.drugs,
                availability: record.availability.label(),
                otc: record.availability.is_otc(),
                caution: &record.caution,
                dose_note: record.dose_note.as_deref(),
                image_url: record.image_url.as_deref(),
                warnings: panel.warnings.iter().map(|w| w.message).collect(),
            }
        })
        .collect();
    let show_scores = report.detail.is_some() && results.len() > 1;
    let body = tmpl.render(context! {
        query => &report.query,
        disclaimer => DISCLAIMER,
        red_flags => &report.red_flags,
        detail => &report.detail,
        results => results,
        show_scores => show_scores,
        advisory => report.advisory,
        age => report.age,
    })?;
    Ok(body)
}

pub fn table_markdown(table: &SymptomTable) -> Result<String, SymptomRxError> {
    let tmpl = env()?.get_template("table.md.j2")?;
    let rows: Vec<TableRow<'_>> = table
        .records()
        .iter()
        .map(|r| TableRow {
            symptom: &r.symptom,
            diseases: &r.diseases,
            availability: r.availability.label(),
        })
        .collect();
    Ok(tmpl.render(context! { rows => rows })?)
}

pub fn log_markdown(entries: &[LogEntry], path: &Path) -> Result<String, SymptomRxError> {
    let tmpl = env()?.get_template("log.md.j2")?;
    Ok(tmpl.render(context! {
        entries => entries,
        path => path.display().to_string(),
    })?)
}
