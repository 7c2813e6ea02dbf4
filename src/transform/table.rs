use std::io::Read;

use serde::Deserialize;

use crate::entities::symptom::{Availability, SymptomRecord};
use crate::error::SymptomRxError;
use crate::utils::serde::{StringOrVec, split_list};

/// Shape of one entry in the embedded JSON table. Older entries carry a single
/// string where newer ones carry a list.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    symptom: String,
    #[serde(default)]
    diseases: StringOrVec,
    #[serde(default)]
    drugs: StringOrVec,
    #[serde(default)]
    ingredients: StringOrVec,
    #[serde(default)]
    caution: String,
    availability: Availability,
    #[serde(default)]
    dose_note: Option<String>,
    #[serde(default)]
    hints: StringOrVec,
    #[serde(default)]
    image_url: Option<String>,
}

/// One row of a user-supplied CSV table. List columns are `;`-separated.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    symptom: String,
    #[serde(default)]
    diseases: String,
    #[serde(default)]
    drugs: String,
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    caution: String,
    availability: String,
    #[serde(default)]
    dose_note: String,
    #[serde(default)]
    hints: String,
    #[serde(default)]
    image_url: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn records_from_json(bytes: &[u8]) -> Result<Vec<SymptomRecord>, SymptomRxError> {
    let raw: Vec<JsonRecord> = serde_json::from_slice(bytes)?;
    Ok(raw
        .into_iter()
        .map(|r| SymptomRecord {
            symptom: r.symptom,
            diseases: r.diseases.into_vec(),
            drugs: r.drugs.into_vec(),
            ingredients: r.ingredients.into_vec(),
            caution: r.caution,
            availability: r.availability,
            dose_note: non_empty(r.dose_note),
            hints: r.hints.into_vec(),
            image_url: non_empty(r.image_url),
        })
        .collect())
}

pub(crate) fn records_from_csv<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<SymptomRecord>, SymptomRxError> {
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<CsvRecord>().enumerate() {
        let row = row?;
        let availability = row.availability.parse::<Availability>().map_err(|err| {
            SymptomRxError::InvalidTable(format!("row {} ('{}'): {err}", idx + 1, row.symptom))
        })?;
        out.push(SymptomRecord {
            symptom: row.symptom,
            diseases: split_list(&row.diseases),
            drugs: split_list(&row.drugs),
            ingredients: split_list(&row.ingredients),
            caution: row.caution.trim().to_string(),
            availability,
            dose_note: non_empty(Some(row.dose_note)),
            hints: split_list(&row.hints),
            image_url: non_empty(Some(row.image_url)),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_accepts_single_string_and_list_fields() {
        let json = r#"[
            {"symptom": "두통", "diseases": "긴장성 두통", "drugs": ["아세트아미노펜"],
             "caution": "간 질환 주의", "availability": "otc-pharmacy",
             "image_url": "https://example.org/paracetamol.jpg"},
            {"symptom": "불면", "diseases": ["스트레스", "불안장애"], "drugs": "수면유도제",
             "caution": "의존성 주의", "availability": "prescription", "dose_note": "  "}
        ]"#;
        let records = records_from_json(json.as_bytes()).expect("parsed");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].diseases, vec!["긴장성 두통"]);
        assert_eq!(
            records[0].image_url.as_deref(),
            Some("https://example.org/paracetamol.jpg")
        );
        assert_eq!(records[1].image_url, None);
        assert_eq!(records[1].drugs, vec!["수면유도제"]);
        assert_eq!(records[1].availability, Availability::PrescriptionRequired);
        assert_eq!(records[1].dose_note, None);
    }

    #[test]
    fn csv_rows_split_list_columns() {
        let data = "symptom,diseases,drugs,ingredients,caution,availability,dose_note,hints\n\
                    기침,기관지염;감기,덱스트로메토르판,덱스트로메토르판,고혈압 주의,otc-pharmacy,하루 3회,가래;밤\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        let records = records_from_csv(reader).expect("parsed");
        assert_eq!(records[0].diseases, vec!["기관지염", "감기"]);
        assert_eq!(records[0].hints, vec!["가래", "밤"]);
        assert_eq!(records[0].dose_note.as_deref(), Some("하루 3회"));
        assert_eq!(records[0].image_url, None);
    }

    #[test]
    fn csv_image_url_column_is_read_when_present() {
        let data = concat!(
            "symptom,diseases,drugs,ingredients,caution,availability,dose_note,hints,image_url\n",
            "열,감염,이부프로펜,,,otc-pharmacy,,,https://example.org/ibu.jpg\n",
            "피로,과로,영양제,,,otc-convenience,,,\n",
        );
        let reader = csv::Reader::from_reader(data.as_bytes());
        let records = records_from_csv(reader).expect("parsed");
        assert_eq!(
            records[0].image_url.as_deref(),
            Some("https://example.org/ibu.jpg")
        );
        assert_eq!(records[1].image_url, None);
    }

    #[test]
    fn csv_unknown_availability_names_the_row() {
        let data = "symptom,diseases,drugs,ingredients,caution,availability,dose_note,hints\n\
                    피로,과로,영양제,,,somewhere,,\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        let err = records_from_csv(reader).expect_err("bad availability");
        let msg = err.to_string();
        assert!(msg.contains("row 1"));
        assert!(msg.contains("피로"));
    }
}
