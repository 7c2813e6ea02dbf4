//! Transform adapters from table file shapes into CLI-facing entity models.

pub(crate) mod table;
