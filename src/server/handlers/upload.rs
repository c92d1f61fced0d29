//! Document intake: file uploads and editor text.

use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::super::session::SessionHandle;
use super::super::templates;
use super::super::AppState;
use super::helpers::{api_error, with_session};
use crate::analysis::MIN_CONTENT_CHARS;
use crate::extract::{allowed_file, check_content_type};
use crate::models::FileInfo;
use crate::utils::{file_extension, format_size, secure_filename};
use crate::wizard::StoredFile;

/// Per-session upload directory.
fn session_dir(state: &AppState, handle: &SessionHandle) -> PathBuf {
    state.settings.upload_dir.join(&handle.id)
}

async fn save_bytes(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Extract text off the async runtime. Failures leave the text empty.
async fn extract_text(state: &AppState, path: PathBuf) -> String {
    let extractor = state.extractor.clone();
    let shown = path.display().to_string();
    match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!("Text extraction failed for {}: {}", shown, e);
            String::new()
        }
        Err(e) => {
            tracing::warn!("Text extraction task failed for {}: {}", shown, e);
            String::new()
        }
    }
}

/// Accept a PDF or DOCX upload.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    if state.sessions.load(&handle).doc_type.is_none() {
        return with_session(&handle, api_error("Please select a document type first"));
    }

    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (e.status(), e.body_text()).into_response(),
        };
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((name, bytes.to_vec())),
            Err(e) => return (e.status(), e.body_text()).into_response(),
        }
        break;
    }

    let Some((original_name, bytes)) = upload else {
        return with_session(&handle, api_error("No file provided"));
    };
    if original_name.trim().is_empty() {
        return with_session(&handle, api_error("No file selected"));
    }

    let filename = secure_filename(&original_name);
    let ext = match file_extension(&filename) {
        Some(ext) if allowed_file(&original_name) && allowed_file(&filename) => ext,
        _ => {
            return with_session(
                &handle,
                api_error("Invalid file type. Please upload a PDF or DOCX file"),
            )
        }
    };

    if let Err(e) = check_content_type(&bytes, &ext) {
        tracing::warn!("Rejected upload {}: {}", filename, e);
        return with_session(&handle, api_error(e.to_string()));
    }

    let path = match save_bytes(&session_dir(&state, &handle), &filename, &bytes).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to save upload {}: {}", filename, e);
            return with_session(&handle, api_error(format!("Failed to save file: {}", e)));
        }
    };

    let extracted_text = extract_text(&state, path.clone()).await;
    let info = FileInfo::for_upload(&filename, &ext, &bytes);
    tracing::info!(
        "Session {} uploaded {} ({}, {} chars extracted)",
        handle.id,
        filename,
        format_size(info.size),
        extracted_text.len()
    );

    let status_html = templates::upload_status(&info);
    state.sessions.update(&handle, |s| {
        s.attach_file(StoredFile {
            path,
            content: extracted_text.clone(),
            info: info.clone(),
        })
    });

    with_session(
        &handle,
        Json(json!({
            "success": true,
            "file_info": info,
            "extracted_text": extracted_text,
            "status_html": status_html,
            "next_step": 3,
        })),
    )
}

/// Body sent by the editor. `content` carries markup and is not stored.
#[derive(Debug, Default, Deserialize)]
pub struct EditorContent {
    #[serde(default)]
    pub text: Option<String>,
}

/// Store text written in the browser as the session's document.
pub async fn save_editor_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<EditorContent>>,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    if state.sessions.load(&handle).doc_type.is_none() {
        return with_session(&handle, api_error("Please select a document type first"));
    }

    let text = body.and_then(|Json(b)| b.text).unwrap_or_default();
    if text.trim().chars().count() < MIN_CONTENT_CHARS {
        return with_session(
            &handle,
            api_error("Content is too short. Please write at least 50 characters."),
        );
    }

    let filename = format!("editor_content_{}.txt", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = match save_bytes(&session_dir(&state, &handle), &filename, text.as_bytes()).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to save editor content: {}", e);
            return with_session(&handle, api_error(format!("Failed to save content: {}", e)));
        }
    };

    let info = FileInfo::for_editor(&filename, &text);
    let status_html = templates::upload_status(&info);
    state.sessions.update(&handle, |s| {
        s.attach_file(StoredFile {
            path,
            content: text,
            info: info.clone(),
        })
    });

    with_session(
        &handle,
        Json(json!({
            "success": true,
            "file_info": info,
            "status_html": status_html,
            "next_step": 3,
        })),
    )
}
