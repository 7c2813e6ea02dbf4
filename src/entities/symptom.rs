use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SymptomRxError;
use crate::transform;

#[derive(RustEmbed)]
#[folder = "data/"]
struct EmbeddedData;

const BUILTIN_TABLE_ASSET: &str = "symptoms.json";

static BUILTIN: OnceLock<SymptomTable> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "otc-pharmacy")]
    OtcPharmacy,
    #[serde(rename = "otc-convenience")]
    OtcConvenience,
    #[serde(rename = "prescription")]
    PrescriptionRequired,
}

impl Availability {
    pub fn token(self) -> &'static str {
        match self {
            Self::OtcPharmacy => "otc-pharmacy",
            Self::OtcConvenience => "otc-convenience",
            Self::PrescriptionRequired => "prescription",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OtcPharmacy => "일반의약품 (약국에서 구매 가능)",
            Self::OtcConvenience => "안전상비의약품 (편의점에서 구매 가능)",
            Self::PrescriptionRequired => "병원 처방 필요",
        }
    }

    pub fn is_otc(self) -> bool {
        !matches!(self, Self::PrescriptionRequired)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Availability {
    type Err = SymptomRxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.trim();
        [
            Self::OtcPharmacy,
            Self::OtcConvenience,
            Self::PrescriptionRequired,
        ]
        .into_iter()
        .find(|a| a.token().eq_ignore_ascii_case(v) || a.label() == v)
        .ok_or_else(|| {
            SymptomRxError::InvalidTable(format!(
                "unknown availability '{v}' (expected otc-pharmacy, otc-convenience, or prescription)"
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub symptom: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diseases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drugs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    pub caution: String,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Ordered, immutable symptom table. Keys are unique.
#[derive(Debug, Clone)]
pub struct SymptomTable {
    records: Vec<SymptomRecord>,
}

impl SymptomTable {
    pub fn from_records(records: Vec<SymptomRecord>) -> Result<Self, SymptomRxError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for record in &records {
            if record.symptom.trim().is_empty() {
                return Err(SymptomRxError::InvalidTable(
                    "symptom key must not be empty".into(),
                ));
            }
            if !seen.insert(record.symptom.as_str()) {
                return Err(SymptomRxError::InvalidTable(format!(
                    "duplicate symptom key '{}'",
                    record.symptom
                )));
            }
        }
        if records.is_empty() {
            warn!("symptom table has no records; every lookup will miss");
        }
        Ok(Self { records })
    }

    /// The sample table shipped with the binary, parsed once per process.
    pub fn builtin() -> Result<&'static SymptomTable, SymptomRxError> {
        if let Some(table) = BUILTIN.get() {
            return Ok(table);
        }

        let Some(asset) = EmbeddedData::get(BUILTIN_TABLE_ASSET) else {
            return Err(SymptomRxError::NotFound {
                entity: "table asset".into(),
                id: BUILTIN_TABLE_ASSET.into(),
                suggestion: "Rebuild symptomrx with data/symptoms.json present.".into(),
            });
        };
        let records = transform::table::records_from_json(&asset.data)?;
        let table = Self::from_records(records)?;
        debug!(records = table.len(), "loaded built-in symptom table");

        let _ = BUILTIN.set(table);
        BUILTIN.get().ok_or_else(|| {
            SymptomRxError::InvalidTable("built-in table initialization race".into())
        })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, SymptomRxError> {
        let reader = csv::Reader::from_path(path)?;
        let records = transform::table::records_from_csv(reader)?;
        let table = Self::from_records(records)?;
        debug!(
            records = table.len(),
            path = %path.display(),
            "loaded symptom table from CSV"
        );
        Ok(table)
    }

    pub fn records(&self) -> &[SymptomRecord] {
        &self.records
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.symptom.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&SymptomRecord> {
        self.records.iter().find(|r| r.symptom == key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(symptom: &str, drug: &str, ingredient: &str) -> SymptomRecord {
    SymptomRecord {
        symptom: symptom.to_string(),
        diseases: vec![format!("{symptom} 관련 질환")],
        drugs: vec![drug.to_string()],
        ingredients: vec![ingredient.to_string()],
        caution: "주의".to_string(),
        availability: Availability::OtcPharmacy,
        dose_note: None,
        hints: Vec::new(),
        image_url: None,
    }
}
