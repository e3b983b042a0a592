use minijinja::context;

use crate::entities::brand;
use crate::entities::drug::DrugInfo;
use crate::error::DrugInfoError;

pub fn index_page() -> Result<String, DrugInfoError> {
    let tmpl = super::env()?.get_template("index.html.j2")?;
    let brands: Vec<&str> = brand::brand_entries()
        .iter()
        .map(|(brand, _)| *brand)
        .collect();
    Ok(tmpl.render(context! { brands => brands })?)
}

pub fn result_page(info: &DrugInfo) -> Result<String, DrugInfoError> {
    let tmpl = super::env()?.get_template("result.html.j2")?;
    Ok(tmpl.render(context! { info => info })?)
}

pub fn error_page(message: &str) -> Result<String, DrugInfoError> {
    let tmpl = super::env()?.get_template("error.html.j2")?;
    Ok(tmpl.render(context! { message => message })?)
}
