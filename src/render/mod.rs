//! Output renderers: Markdown panels, JSON, and download payloads.

pub mod export;
pub mod json;
pub mod markdown;
