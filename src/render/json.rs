use serde::Serialize;

use crate::error::DrugInfoError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, DrugInfoError> {
    Ok(serde_json::to_string_pretty(value)?)
}
