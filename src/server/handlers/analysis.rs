//! Analysis endpoint.

use axum::{extract::State, http::HeaderMap, response::Response, Json};
use chrono::Utc;
use serde_json::json;

use super::super::templates;
use super::super::AppState;
use super::super::session::SessionHandle;
use super::helpers::with_session;
use crate::analysis::ensure_sufficient;
use crate::models::FileSource;

/// Error body that also carries a failure panel for the analysis section.
fn failed(handle: &SessionHandle, message: impl Into<String>) -> Response {
    let message = message.into();
    let html = templates::failure_panel("Analysis Failed", &message);
    with_session(
        handle,
        Json(json!({
            "success": false,
            "error": message,
            "html": html,
        })),
    )
}

/// Grade the session's document against its type's required elements.
pub async fn analyze(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    let session = state.sessions.load(&handle);

    let Some(file) = session.file.as_ref() else {
        return failed(&handle, "No file uploaded");
    };
    if !state.analyzer.is_available() {
        return failed(&handle, state.analyzer.unavailable_reason());
    }
    let Some(doc_type) = session.knowledge_type() else {
        return failed(&handle, "Please select a document type first");
    };

    let mut content = file.content.clone();
    if content.trim().is_empty() {
        content = match file.info.source {
            FileSource::Editor => tokio::fs::read_to_string(&file.path).await.unwrap_or_default(),
            FileSource::Upload => {
                let extractor = state.extractor.clone();
                let path = file.path.clone();
                match tokio::task::spawn_blocking(move || extractor.extract(&path)).await {
                    Ok(Ok(text)) => text,
                    Ok(Err(e)) => {
                        tracing::warn!("Re-extraction failed for {}: {}", file.info.name, e);
                        String::new()
                    }
                    Err(e) => {
                        tracing::warn!("Re-extraction task failed: {}", e);
                        String::new()
                    }
                }
            }
        };
    }

    if let Err(e) = ensure_sufficient(&content) {
        return failed(&handle, e.to_string());
    }

    tracing::info!(
        "Analyzing {} ({} chars) as {}",
        file.info.name,
        content.len(),
        doc_type.id
    );

    let analysis = match state.analyzer.analyze(&content, doc_type).await {
        Ok(analysis) => analysis.stamped(Utc::now()),
        Err(e) => {
            tracing::error!("Analysis failed for {}: {}", file.info.name, e);
            return failed(&handle, format!("Analysis failed: {}", e));
        }
    };

    let sha = file.info.sha256.as_str();
    let graded_as = doc_type.id;
    // The document or its type may have changed while the model was working.
    let stored = state.sessions.update(&handle, |s| {
        let current = s.doc_type.as_deref() == Some(graded_as)
            && s.file.as_ref().is_some_and(|f| f.info.sha256 == sha);
        if current {
            s.analysis = Some(analysis.clone());
            s.enhancement = None;
        }
        current
    });
    if !stored {
        tracing::warn!(
            "Discarding analysis of {} as {}: session changed meanwhile",
            file.info.name,
            graded_as
        );
        return failed(
            &handle,
            "The document or its type changed during analysis. Please analyze again.",
        );
    }

    let html = templates::analysis_report(&analysis);

    with_session(
        &handle,
        Json(json!({
            "success": true,
            "next_step": 4,
            "analysis": analysis,
            "html": html,
        })),
    )
}
