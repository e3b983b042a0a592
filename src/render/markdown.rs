use minijinja::context;

use crate::entities::drug::DrugInfo;
use crate::error::DrugInfoError;

#[derive(serde::Serialize)]
struct SectionRow<'a> {
    title: &'static str,
    text: &'a str,
}

fn section_title(slot: &str) -> Option<&'static str> {
    match slot {
        "moa" => Some("Mechanism of Action"),
        "indications" => Some("Indications and Usage"),
        "warnings" => Some("Warnings"),
        "blackbox" => Some("Boxed Warning"),
        "dosage" => Some("Dosage and Administration"),
        "description" => Some("Description"),
        "contra" => Some("Contraindications"),
        "sideeffects" => Some("Side Effects"),
        "interactions" => Some("Drug Interactions"),
        "pregnancy" => Some("Pregnancy"),
        "overdose" => Some("Overdose"),
        _ => None,
    }
}

fn sections(info: &DrugInfo) -> Vec<SectionRow<'_>> {
    info.fields()
        .into_iter()
        .filter_map(|(slot, text)| section_title(slot).map(|title| SectionRow { title, text }))
        .collect()
}

pub fn drug_markdown(info: &DrugInfo) -> Result<String, DrugInfoError> {
    let tmpl = super::env()?.get_template("drug.md.j2")?;
    Ok(tmpl.render(context! {
        info => info,
        sections => sections(info),
    })?)
}
