use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SymptomRxError;

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;
const SYMPTOM_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub name: String,
    pub age: u32,
    pub symptoms: Vec<String>,
}

/// On-disk row. Symptoms are stored comma-joined in one column.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    #[serde(rename = "이름")]
    name: String,
    #[serde(rename = "나이")]
    age: u32,
    #[serde(rename = "증상")]
    symptoms: String,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            name: entry.name.clone(),
            age: entry.age,
            symptoms: entry.symptoms.join(SYMPTOM_SEPARATOR),
        }
    }
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        Self {
            name: row.name,
            age: row.age,
            symptoms: row
                .symptoms
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl LogEntry {
    pub fn new(name: &str, age: u32, symptoms: &[String]) -> Result<Self, SymptomRxError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SymptomRxError::Validation("이름을 입력해 주세요.".into()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(SymptomRxError::Validation(format!(
                "나이는 {MIN_AGE}~{MAX_AGE} 사이로 입력해 주세요."
            )));
        }
        let symptoms: Vec<String> = symptoms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if symptoms.is_empty() {
            return Err(SymptomRxError::Validation(
                "증상을 최소 1개 이상 입력해 주세요.".into(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            age,
            symptoms,
        })
    }
}

/// Flat CSV log. Every append re-reads and rewrites the whole file; there is no
/// locking, so concurrent writers can lose rows.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<LogEntry>, SymptomRxError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut out = Vec::new();
        for row in reader.deserialize::<LogRow>() {
            out.push(LogEntry::from(row?));
        }
        debug!(rows = out.len(), path = %self.path.display(), "loaded symptom log");
        Ok(out)
    }

    pub async fn append(&self, entry: LogEntry) -> Result<Vec<LogEntry>, SymptomRxError> {
        let mut entries = self.load().await?;
        entries.push(entry);

        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &entries {
            writer.serialize(LogRow::from(entry))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| SymptomRxError::Io(err.into_error()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, bytes).await?;
        debug!(rows = entries.len(), path = %self.path.display(), "rewrote symptom log");
        Ok(entries)
    }

    /// Removes the whole file. Returns whether a file existed.
    pub async fn clear(&self) -> Result<bool, SymptomRxError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(tag: &str) -> LogStore {
        let suffix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        LogStore::new(
            std::env::temp_dir()
                .join(format!("symptomrx-test-{tag}-{}-{suffix}", std::process::id()))
                .join("log.csv"),
        )
    }

    fn entry(name: &str, age: u32, symptoms: &[&str]) -> LogEntry {
        let symptoms: Vec<String> = symptoms.iter().map(|s| s.to_string()).collect();
        LogEntry::new(name, age, &symptoms).expect("valid entry")
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let store = temp_log("missing");
        assert!(store.load().await.expect("load").is_empty());
        assert!(!store.clear().await.expect("clear"));
    }

    #[tokio::test]
    async fn sequential_appends_end_with_both_entries_in_order() {
        let store = temp_log("append");
        store
            .append(entry("기존", 50, &["피로"]))
            .await
            .expect("seed");

        let first = entry("김철수", 30, &["두통", "발열"]);
        let second = entry("이영희", 25, &["기침"]);
        store.append(first.clone()).await.expect("first");
        store.append(second.clone()).await.expect("second");

        let rows = store.load().await.expect("load");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], first);
        assert_eq!(rows[2], second);

        assert!(store.clear().await.expect("clear"));
        assert!(store.load().await.expect("reload").is_empty());
    }

    #[tokio::test]
    async fn file_uses_korean_header_and_joined_symptoms() {
        let store = temp_log("header");
        store
            .append(entry("박민수", 41, &["두통", "목 통증"]))
            .await
            .expect("append");
        let text = tokio::fs::read_to_string(store.path()).await.expect("read");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("이름,나이,증상"));
        assert_eq!(lines.next(), Some("박민수,41,\"두통, 목 통증\""));
        store.clear().await.expect("clear");
    }

    #[test]
    fn entry_validation_messages() {
        let symptoms = vec!["두통".to_string()];
        assert!(LogEntry::new("  ", 20, &symptoms).is_err());
        assert!(LogEntry::new("김", 0, &symptoms).is_err());
        assert!(LogEntry::new("김", 121, &symptoms).is_err());
        assert!(LogEntry::new("김", 20, &[" ".to_string()]).is_err());
        assert!(LogEntry::new("김", 120, &symptoms).is_ok());
    }
}
