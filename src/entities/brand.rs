//! Indian brand name to generic substance lookup.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Brand → generic, keys lowercase. Combination products map to a
/// space-joined list of substances.
const BRAND_TO_GENERIC: &[(&str, &str)] = &[
    // Diabetes
    ("glycomet", "metformin"),
    ("glycomet gp", "metformin glimepiride"),
    ("glucophage", "metformin"),
    ("janumet", "sitagliptin metformin"),
    ("galvus", "vildagliptin"),
    ("galvus met", "vildagliptin metformin"),
    ("januvia", "sitagliptin"),
    ("trajenta", "linagliptin"),
    ("istamet", "sitagliptin metformin"),
    // Pain / fever
    ("dolo", "acetaminophen"),
    ("dolo 650", "acetaminophen"),
    ("calpol", "acetaminophen"),
    ("crocin", "acetaminophen"),
    ("combiflam", "ibuprofen acetaminophen"),
    // Antibiotics
    ("augmentin", "amoxicillin clavulanic acid"),
    ("zifi", "cefixime"),
    ("taxim o", "cefixime"),
    ("ciplox", "ciprofloxacin"),
    ("azee", "azithromycin"),
    ("meftal", "mefenamic acid"),
    // Allergy
    ("allegra", "fexofenadine"),
    ("cetcip", "cetirizine"),
    ("okacet", "cetirizine"),
    ("telekast", "montelukast"),
    // Acidity / GERD
    ("rantac", "ranitidine"),
    ("pan d", "pantoprazole domperidone"),
    ("pan", "pantoprazole"),
    ("omez", "omeprazole"),
    // Cardiovascular
    ("atorva", "atorvastatin"),
    ("rosuvas", "rosuvastatin"),
    ("telma", "telmisartan"),
    ("amlong", "amlodipine"),
    ("metolar", "metoprolol"),
    // Vitamins
    ("neurobion", "vitamin b complex"),
    ("revital", "multivitamin"),
    ("becosules", "b complex"),
    ("limcee", "vitamin c"),
    // Respiratory
    ("asthalin", "salbutamol"),
    ("foracort", "budesonide formoterol"),
    // Thyroid
    ("eltroxin", "levothyroxine"),
    // Anxiety
    ("zapiz", "clonazepam"),
    ("nexito", "escitalopram"),
    // Gastric motility
    ("domstal", "domperidone"),
];

static BRAND_INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn index() -> &'static HashMap<&'static str, &'static str> {
    BRAND_INDEX.get_or_init(|| BRAND_TO_GENERIC.iter().copied().collect())
}

/// All brand entries in table order.
pub fn brand_entries() -> &'static [(&'static str, &'static str)] {
    BRAND_TO_GENERIC
}

/// Returns the generic name for a known brand, else `input` unchanged.
///
/// Matching is exact; callers pass input already trimmed and lowercased.
pub fn resolve(input: &str) -> &str {
    index().get(input).copied().unwrap_or(input)
}
