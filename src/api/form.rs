//! Registration form page

use axum::response::Html;

const REGISTER_PAGE: &str = include_str!("../../static/register.html");

/// Serve the equipment registration form
pub async fn registration_form() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}
