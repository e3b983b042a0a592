//! Internal utility helpers for query escaping, text casing, and serde helpers.

pub(crate) mod query;
pub(crate) mod serde;
pub(crate) mod text;
