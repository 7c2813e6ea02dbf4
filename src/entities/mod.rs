//! Symptom table, matching, context warnings, and the symptom log used by the CLI.

pub mod context;
pub mod log;
pub mod lookup;
pub mod redflag;
pub mod report;
pub mod symptom;
