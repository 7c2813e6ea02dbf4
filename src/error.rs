#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SymptomRxError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid symptom table: {0}")]
    InvalidTable(String),

    #[error("{entity} '{id}' not found.\n\n{suggestion}")]
    NotFound {
        entity: String,
        id: String,
        suggestion: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Timestamp formatting failed: {0}")]
    TimeFormat(#[from] time::error::Format),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::SymptomRxError;

    #[test]
    fn not_found_display_includes_suggestion() {
        let err = SymptomRxError::NotFound {
            entity: "symptom".to_string(),
            id: "목감기".to_string(),
            suggestion: "Try: symptomrx list".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("symptom '목감기' not found"));
        assert!(msg.contains("Try: symptomrx list"));
    }

    #[test]
    fn validation_display_is_the_bare_message() {
        let err = SymptomRxError::Validation("증상을 입력해 주세요.".to_string());
        assert_eq!(err.to_string(), "증상을 입력해 주세요.");
    }

    #[test]
    fn invalid_table_display_names_the_problem() {
        let err = SymptomRxError::InvalidTable("duplicate symptom key '두통'".to_string());
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid symptom table"));
        assert!(msg.contains("두통"));
    }
}
