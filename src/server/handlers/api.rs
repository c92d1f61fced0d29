//! Wizard API endpoints: type selection, navigation, enhancement, sharing.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use super::super::shares::SharedReport;
use super::super::AppState;
use super::helpers::{api_error, step_number, with_session};
use crate::models::KnowledgeType;
use crate::wizard::{advance, step_from_path, Enhancement, FIRST_STEP};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "analysis_available": state.analyzer.is_available(),
        "pdf_extraction": state.extractor.pdf_supported(),
    }))
}

/// The document type catalog.
pub async fn api_types() -> impl IntoResponse {
    Json(KnowledgeType::all())
}

/// Form body of a type selection.
#[derive(Debug, Deserialize)]
pub struct SelectTypeForm {
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
}

/// Remember the chosen document type.
pub async fn select_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectTypeForm>,
) -> Response {
    let handle = state.sessions.resolve(&headers);

    let Some(doc_type) = form.doc_type.as_deref().and_then(KnowledgeType::get) else {
        return with_session(&handle, api_error("Invalid document type"));
    };

    state.sessions.update(&handle, |s| s.select_type(doc_type.id));
    tracing::info!("Session {} selected type {}", handle.id, doc_type.id);

    with_session(
        &handle,
        Json(json!({
            "success": true,
            "doc_type": doc_type.id,
            "type_info": doc_type,
            "next_step": 2,
        })),
    )
}

/// Body of a navigation request.
#[derive(Debug, Default, Deserialize)]
pub struct NextStepRequest {
    #[serde(default)]
    pub current_step: Option<serde_json::Value>,
}

/// Move to the next step if the current one is complete.
pub async fn next_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<NextStepRequest>>,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let current = match request.current_step.filter(|v| !v.is_null()) {
        Some(value) => match step_number(&value) {
            Some(n) => n,
            None => return with_session(&handle, api_error("Invalid step")),
        },
        None => referer_step(&headers),
    };

    let session = state.sessions.load(&handle);
    match advance(current, &session) {
        Ok(next) => with_session(
            &handle,
            Json(json!({
                "success": true,
                "next_step": next,
                "current_doc_type": session.doc_type,
                "file_info": session.file.as_ref().map(|f| &f.info),
            })),
        ),
        Err(e) => with_session(&handle, api_error(e.to_string())),
    }
}

/// Step of the page that issued the request.
fn referer_step(headers: &HeaderMap) -> i64 {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| step_from_path(url.path()))
        .unwrap_or(FIRST_STEP)
        .into()
}

/// Turn the analysis into a list of improvement items.
pub async fn enhance(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);

    let enhancement = state.sessions.update(&handle, |s| {
        let analysis = s.analysis.as_ref()?;
        let original = s.file.as_ref().map(|f| f.content.as_str()).unwrap_or_default();
        let enhancement = Enhancement::from_analysis(analysis, original);
        s.enhancement = Some(enhancement.clone());
        Some(enhancement)
    });

    match enhancement {
        Some(enhanced) => with_session(
            &handle,
            Json(json!({
                "success": true,
                "next_step": 5,
                "enhanced_content": enhanced,
            })),
        ),
        None => with_session(&handle, api_error("Document not analyzed")),
    }
}

/// Publish a read-only snapshot of the session.
pub async fn share(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    let session = state.sessions.load(&handle);

    let Some(report) = SharedReport::from_session(&session) else {
        return with_session(&handle, api_error("Document not enhanced"));
    };

    let shared_at = report.shared_at;
    let expires_at = chrono::Duration::from_std(state.shares.ttl())
        .ok()
        .and_then(|ttl| shared_at.checked_add_signed(ttl));
    let id = state.shares.publish(report);
    let share_url = format!("{}/shared/{}", state.settings.public_base_url(), id);
    tracing::info!("Session {} shared report {}", handle.id, id);

    with_session(
        &handle,
        Json(json!({
            "success": true,
            "share_info": {
                "shared_at": shared_at,
                "share_url": share_url,
                "expiry": state.shares.expiry_label(),
                "expires_at": expires_at,
            },
        })),
    )
}
