//! Template and sample downloads for each document type.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};

use super::super::AppState;
use super::helpers::{redirect_with_flash, with_session};
use crate::models::KnowledgeType;

/// Blank template for a document type.
pub async fn download_template(
    State(state): State<AppState>,
    Path(doc_type): Path<String>,
    headers: HeaderMap,
) -> Response {
    send_asset(&state, &headers, &doc_type, |t| t.template_file, "Template file not found").await
}

/// Worked example for a document type.
pub async fn download_sample(
    State(state): State<AppState>,
    Path(doc_type): Path<String>,
    headers: HeaderMap,
) -> Response {
    send_asset(&state, &headers, &doc_type, |t| t.sample_file, "Sample file not found").await
}

async fn send_asset(
    state: &AppState,
    headers: &HeaderMap,
    doc_type: &str,
    pick: fn(&KnowledgeType) -> &'static str,
    missing: &str,
) -> Response {
    let handle = state.sessions.resolve(headers);

    let Some(kind) = KnowledgeType::get(doc_type) else {
        return redirect_with_flash(state, &handle, "Invalid document type", "/");
    };

    let path = state.settings.assets_dir.join(pick(kind));
    let content = match tokio::fs::read(&path).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Asset {} unavailable: {}", path.display(), e);
            return redirect_with_flash(state, &handle, missing, "/");
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.docx", kind.id));
    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    with_session(
        &handle,
        (
            [
                (header::CONTENT_TYPE, mime),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            content,
        )
            .into_response(),
    )
}
