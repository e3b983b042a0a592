use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::brand;
use crate::error::DrugInfoError;
use crate::sources::openfda::{LabelLookup, OpenFdaClient};
use crate::transform;

pub const NO_INFORMATION: &str = "No information available";
pub const SOURCE_FOUND: &str = "OpenFDA";
pub const SOURCE_NOT_FOUND: &str = "No OpenFDA data found";

/// Display-ready label summary for one query. Every field is always set;
/// sections the label lacks hold [`NO_INFORMATION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugInfo {
    pub query: String,
    pub generic: String,
    pub brand: String,
    #[serde(rename = "class")]
    pub drug_class: String,
    pub moa: String,
    pub indications: String,
    pub warnings: String,
    pub blackbox: String,
    pub dosage: String,
    pub description: String,
    pub contra: String,
    pub sideeffects: String,
    pub interactions: String,
    pub pregnancy: String,
    pub overdose: String,
    pub manufacturer: String,
    pub source: String,
}

pub const DRUG_INFO_FIELD_COUNT: usize = 17;

impl DrugInfo {
    /// `(slot name, value)` pairs in display order.
    pub fn fields(&self) -> [(&'static str, &str); DRUG_INFO_FIELD_COUNT] {
        [
            ("query", self.query.as_str()),
            ("generic", self.generic.as_str()),
            ("brand", self.brand.as_str()),
            ("class", self.drug_class.as_str()),
            ("moa", self.moa.as_str()),
            ("indications", self.indications.as_str()),
            ("warnings", self.warnings.as_str()),
            ("blackbox", self.blackbox.as_str()),
            ("dosage", self.dosage.as_str()),
            ("description", self.description.as_str()),
            ("contra", self.contra.as_str()),
            ("sideeffects", self.sideeffects.as_str()),
            ("interactions", self.interactions.as_str()),
            ("pregnancy", self.pregnancy.as_str()),
            ("overdose", self.overdose.as_str()),
            ("manufacturer", self.manufacturer.as_str()),
            ("source", self.source.as_str()),
        ]
    }
}

/// Trims and lowercases raw user input.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolves `raw` through the brand table, fetches the first matching label,
/// and flattens it into a [`DrugInfo`].
///
/// An unreachable upstream yields the same view as an unknown drug. Errors
/// are returned only for local faults.
pub async fn get(client: &OpenFdaClient, raw: &str) -> Result<DrugInfo, DrugInfoError> {
    let query = normalize_query(raw);
    let term = brand::resolve(&query);
    if term != query {
        debug!(brand = %query, generic = term, "Resolved brand name");
    }

    let lookup = client.label_search(term).await?;
    info!(term, outcome = lookup.outcome(), "Label lookup finished");
    if let LabelLookup::Unreachable { reason } = &lookup {
        debug!(term, %reason, "Rendering unreachable label source as no data");
    }

    let record = lookup.into_record();
    Ok(transform::label::drug_info(record.as_ref(), term))
}
