use serde_json::Value;

use crate::entities::drug::{DrugInfo, NO_INFORMATION, SOURCE_FOUND, SOURCE_NOT_FOUND};
use crate::sources::openfda::LabelRecord;
use crate::utils::serde::StringOrVec;
use crate::utils::text::title_case;

const SECTION_SEPARATOR: &str = "\n\n";
const NAME_SEPARATOR: &str = ", ";

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Text of the first key in `keys` present on the label. Later keys are
/// fallbacks only; values are never merged across keys.
fn section(record: &LabelRecord, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| record.get(key))
        .map(value_text)
        .unwrap_or_else(|| NO_INFORMATION.to_string())
}

fn names(value: Option<StringOrVec>) -> String {
    value
        .map(|v| v.join(NAME_SEPARATOR))
        .unwrap_or_else(|| NO_INFORMATION.to_string())
}

fn not_found(query: &str) -> DrugInfo {
    let none = || NO_INFORMATION.to_string();
    DrugInfo {
        query: query.to_string(),
        generic: title_case(query),
        brand: none(),
        drug_class: none(),
        moa: none(),
        indications: none(),
        warnings: none(),
        blackbox: none(),
        dosage: none(),
        description: none(),
        contra: none(),
        sideeffects: none(),
        interactions: none(),
        pregnancy: none(),
        overdose: none(),
        manufacturer: none(),
        source: SOURCE_NOT_FOUND.to_string(),
    }
}

/// Flattens an optional label into the fixed display view.
pub(crate) fn drug_info(record: Option<&LabelRecord>, query: &str) -> DrugInfo {
    let Some(record) = record else {
        return not_found(query);
    };

    let metadata = record.metadata();
    DrugInfo {
        query: query.to_string(),
        generic: names(metadata.generic_name),
        brand: names(metadata.brand_name),
        drug_class: names(metadata.pharm_class_epc.or(metadata.pharm_class)),
        moa: section(record, &["mechanism_of_action"]),
        indications: section(record, &["indications_and_usage"]),
        warnings: section(record, &["warnings"]),
        blackbox: section(record, &["boxed_warning"]),
        dosage: section(record, &["dosage_and_administration"]),
        description: section(record, &["description", "clinical_pharmacology"]),
        contra: section(record, &["contraindications"]),
        sideeffects: section(record, &["adverse_reactions"]),
        interactions: section(record, &["drug_interactions"]),
        pregnancy: section(record, &["pregnancy"]),
        overdose: section(record, &["overdosage"]),
        manufacturer: names(metadata.manufacturer_name),
        source: SOURCE_FOUND.to_string(),
    }
}
