use serde::{Deserialize, Serialize};

/// A label value that upstream sends either as one string or as a list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrVec {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrVec {
    pub fn join(&self, sep: &str) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.join(sep),
        }
    }
}
