use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use handlebars::Handlebars;

use crate::db::{Category, User};
use crate::error::AppError;

lazy_static! {
    /// Handlebars templates.
    pub static ref HBS: handlebars::Handlebars<'static> =
        load_handlebars_templates().expect("error initializing Handlebars templates");
}

/// Loads handlebars templates from disk in debug mode or from the binary in
/// release mode.
fn load_handlebars_templates() -> Result<Handlebars<'static>, handlebars::TemplateError> {
    use chrono::{DateTime, Utc};
    use handlebars::handlebars_helper;

    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(true);
    hbs.set_dev_mode(cfg!(debug_assertions));

    handlebars_helper!(date: |t: DateTime<Utc>| t.date_naive().to_string());
    hbs.register_helper("date", Box::new(date));
    handlebars_helper!(category_label: |slug: String| {
        slug.parse::<Category>().map(Category::label).unwrap_or("?")
    });
    hbs.register_helper("category_label", Box::new(category_label));

    hbs.register_embed_templates_with_extension::<HtmlTemplates>(".hbs")?;

    hbs.register_partial("layout", include_str!("../html/layout.html.hbs"))?;

    Ok(hbs)
}

pub fn render_html_template(
    template_name: &str,
    active_user: &Option<User>,
    data: serde_json::Value,
) -> Response {
    match render_html_template_internal(template_name, active_user, data) {
        Ok(resp) => resp,
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, {
            let error_msg = format!("template error: {e}");
            let data = serde_json::json!({ "error_msg": error_msg });
            render_html_template_internal("error.html", active_user, data).unwrap_or_else(|e| {
                format!("double template error: {e}\n{error_msg}").into_response()
            })
        })
            .into_response(),
    }
}

fn render_html_template_internal(
    template_name: &str,
    active_user: &Option<User>,
    mut data: serde_json::Value,
) -> Result<Response, handlebars::RenderError> {
    if let serde_json::Value::Object(m) = &mut data {
        m.insert(
            "active_user".to_string(),
            active_user
                .as_ref()
                .map(|u| u.to_header_json())
                .unwrap_or_default(),
        );
    }
    HBS.render(template_name, &data)
        .map(|s| Html(s).into_response())
}

/// Renders an error as a page, with the matching status code.
pub fn render_error(active_user: &Option<User>, error: &AppError) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error.message(), "internal error");
    }
    let data = serde_json::json!({ "error_msg": error.message() });
    (
        status,
        render_html_template("error.html", active_user, data),
    )
        .into_response()
}

#[derive(rust_embed::RustEmbed, Copy, Clone)]
#[folder = "./html"]
#[include = "*.hbs"]
pub struct HtmlTemplates;
