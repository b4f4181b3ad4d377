//! Server-rendered pages.
//!
//! Layout and styling are deliberately minimal; the interactive work
//! (validation feedback, payment redirect handling) happens client-side
//! against the JSON API.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use codemasti_core::STUDENT_CLASSES;

/// Template wrapper that converts Askama templates into HTML responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate;

#[derive(Template)]
#[template(path = "programs.html")]
struct ProgramsTemplate;

#[derive(Template)]
#[template(path = "terms.html")]
struct TermsTemplate;

#[derive(Template)]
#[template(path = "privacy.html")]
struct PrivacyTemplate;

#[derive(Template)]
#[template(path = "refund.html")]
struct RefundTemplate;

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    student_classes: &'static [&'static str],
    batches: [&'static str; 3],
}

#[derive(Template)]
#[template(path = "payment_result.html")]
struct PaymentResultTemplate;

pub async fn index() -> impl IntoResponse {
    HtmlTemplate(IndexTemplate)
}

pub async fn about() -> impl IntoResponse {
    HtmlTemplate(AboutTemplate)
}

pub async fn programs() -> impl IntoResponse {
    HtmlTemplate(ProgramsTemplate)
}

pub async fn terms() -> impl IntoResponse {
    HtmlTemplate(TermsTemplate)
}

pub async fn privacy() -> impl IntoResponse {
    HtmlTemplate(PrivacyTemplate)
}

pub async fn refund() -> impl IntoResponse {
    HtmlTemplate(RefundTemplate)
}

pub async fn register_page() -> impl IntoResponse {
    HtmlTemplate(RegisterTemplate {
        student_classes: STUDENT_CLASSES,
        batches: ["spark", "builders", "innovators"],
    })
}

pub async fn payment_result() -> impl IntoResponse {
    HtmlTemplate(PaymentResultTemplate)
}
