use serde::Serialize;

use crate::error::SymptomRxError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, SymptomRxError> {
    Ok(serde_json::to_string_pretty(value)?)
}
