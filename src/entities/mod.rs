//! Domain lookups: brand resolution and the drug label workflow.

pub(crate) mod brand;
pub(crate) mod drug;
