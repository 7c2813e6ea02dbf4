//! Internal utility helpers for data paths and serde shapes.

pub(crate) mod paths;
pub(crate) mod serde;
