//! Output renderers: HTML pages for the web surface, markdown and JSON for the CLI.

use std::sync::OnceLock;

use minijinja::{AutoEscape, Environment};

use crate::error::DrugInfoError;

pub(crate) mod html;
pub(crate) mod json;
pub(crate) mod markdown;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn escape_for(name: &str) -> AutoEscape {
    if name.ends_with(".html.j2") {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

pub(crate) fn env() -> Result<&'static Environment<'static>, DrugInfoError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.set_auto_escape_callback(escape_for);
    env.add_template("base.html.j2", include_str!("../../templates/base.html.j2"))?;
    env.add_template("index.html.j2", include_str!("../../templates/index.html.j2"))?;
    env.add_template(
        "result.html.j2",
        include_str!("../../templates/result.html.j2"),
    )?;
    env.add_template("error.html.j2", include_str!("../../templates/error.html.j2"))?;
    env.add_template("drug.md.j2", include_str!("../../templates/drug.md.j2"))?;

    let _ = ENV.set(env);
    ENV.get().ok_or_else(|| DrugInfoError::Api {
        api: "templates".into(),
        message: "Template environment initialization race".into(),
    })
}
