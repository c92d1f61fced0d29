//! Helper functions shared by the handlers.

use askama::Template;
use axum::{
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

use super::super::session::SessionHandle;
use super::super::AppState;

/// `{success: false, error}` body. API failures stay HTTP 200 so the
/// browser script can show the message.
pub fn api_error(message: impl Into<String>) -> Json<Value> {
    Json(json!({
        "success": false,
        "error": message.into(),
    }))
}

/// Attach the session cookie when the session was just created.
pub fn with_session(handle: &SessionHandle, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = handle.set_cookie() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Render an askama page, falling back to the error text.
pub fn render_page<T: Template>(template: T) -> Html<String> {
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Queue a flash message for the next page and redirect there.
pub fn redirect_with_flash(
    state: &AppState,
    handle: &SessionHandle,
    message: &str,
    to: &str,
) -> Response {
    state
        .sessions
        .update(handle, |s| s.flash = Some(message.to_string()));
    with_session(handle, Redirect::to(to))
}

/// Parse a step number sent as either a JSON number or a numeric string.
pub fn step_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
