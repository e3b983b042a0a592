//! Transform adapters from upstream label shapes into display views.

pub(crate) mod label;
