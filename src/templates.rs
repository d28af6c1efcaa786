//! HTML template environment.
//!
//! The environment is constructed once at startup and carried in
//! [`crate::state::AppState`] — no global singleton. Templates are embedded
//! at compile time; MiniJinja's default auto-escaping applies to the
//! `.html` names, so every interpolated value is HTML-escaped unless
//! explicitly marked safe (nothing here is).

use crate::errors::AppError;
use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

/// Build the template environment with all embedded templates registered.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../templates/index.html"))?;
    env.add_template("upload.html", include_str!("../templates/upload.html"))?;
    Ok(env)
}

/// Render a registered template into an HTML response.
pub fn render(
    env: &Environment<'_>,
    name: &str,
    ctx: impl Serialize,
) -> Result<Html<String>, AppError> {
    let template = env.get_template(name)?;
    let body = template.render(ctx)?;
    Ok(Html(body))
}
