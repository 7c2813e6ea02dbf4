use std::path::PathBuf;

pub const LOG_FILE_NAME: &str = "symptom_log.csv";

pub fn symptomrx_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("symptomrx"),
        None => std::env::temp_dir().join("symptomrx"),
    }
}

pub fn default_log_path() -> PathBuf {
    symptomrx_data_dir().join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_path_lives_under_symptomrx_dir() {
        let path = default_log_path();
        assert!(path.ends_with(format!("symptomrx/{LOG_FILE_NAME}")));
    }
}
