//! Wizard page handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use super::super::template_structs::{
    AnalysisTemplate, EnhanceTemplate, ErrorTemplate, PageChrome, SelectTypeTemplate,
    ShareTemplate, SharedReportTemplate, TypeCard, UploadTemplate,
};
use super::super::templates;
use super::super::AppState;
use super::helpers::{render_page, with_session};
use crate::models::FileSource;
use crate::wizard::{check_page, PageAccess, WizardSession, WizardStep};

/// Start page. Returning here starts the wizard over.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    // A pending message from a redirect survives the reset.
    let flash = state.sessions.update(&handle, |s| {
        let flash = s.take_flash();
        *s = WizardSession::default();
        flash
    });

    let session = WizardSession::default();
    let page = render_step(WizardStep::SelectType, &session, flash);
    with_session(&handle, page)
}

/// A numbered wizard step, subject to the page gate.
pub async fn step_page(
    State(state): State<AppState>,
    Path(step): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let handle = state.sessions.resolve(&headers);

    let (access, session, flash) = state.sessions.update(&handle, |s| {
        let access = check_page(step, s);
        let flash = match &access {
            PageAccess::Allow(_) => s.take_flash(),
            PageAccess::Redirect { message, .. } => {
                s.flash = Some(message.to_string());
                None
            }
            PageAccess::Restart => None,
        };
        (access, s.clone(), flash)
    });

    let response = match access {
        PageAccess::Allow(step) => render_step(step, &session, flash),
        PageAccess::Restart => Redirect::to("/").into_response(),
        PageAccess::Redirect { step: target, message } => {
            tracing::debug!("Step {} gated, redirecting to step {}: {}", step, target.number(), message);
            Redirect::to(&format!("/step/{}", target.number())).into_response()
        }
    };
    with_session(&handle, response)
}

fn render_step(step: WizardStep, session: &WizardSession, flash: Option<String>) -> Response {
    let title = step.title();
    let chrome = PageChrome::new(step, session, flash);
    let file_status_html = session
        .file
        .as_ref()
        .map(|f| templates::upload_status(&f.info))
        .unwrap_or_default();

    match step {
        WizardStep::SelectType => render_page(SelectTypeTemplate {
            title,
            chrome,
            types: TypeCard::catalog(session.doc_type.as_deref()),
            has_selection: session.doc_type.is_some(),
        })
        .into_response(),
        WizardStep::Upload => {
            let doc_type = session.doc_type.as_deref().unwrap_or_default();
            let editor_text = session
                .file
                .as_ref()
                .filter(|f| f.info.source == FileSource::Editor)
                .map(|f| f.content.clone())
                .unwrap_or_default();
            render_page(UploadTemplate {
                title,
                chrome,
                has_file: session.file.is_some(),
                file_status_html,
                editor_text,
                template_url: format!("/api/download_template/{}", doc_type),
                sample_url: format!("/api/download_sample/{}", doc_type),
            })
            .into_response()
        }
        WizardStep::Analysis => render_page(AnalysisTemplate {
            title,
            chrome,
            file_status_html,
            has_analysis: session.analysis.is_some(),
            analysis_html: session
                .analysis
                .as_ref()
                .map(templates::analysis_report)
                .unwrap_or_default(),
            loading_html: templates::loading_panel("Analyzing your document..."),
        })
        .into_response(),
        WizardStep::Enhance => render_page(EnhanceTemplate {
            title,
            chrome,
            quality_score: session.analysis.as_ref().map_or(0, |a| a.quality_score),
            has_enhancement: session.enhancement.is_some(),
            improvements: session
                .enhancement
                .as_ref()
                .map(|e| e.improvements.clone())
                .unwrap_or_default(),
        })
        .into_response(),
        WizardStep::Share => render_page(ShareTemplate {
            title,
            chrome,
            file_name: session
                .file
                .as_ref()
                .map(|f| f.info.name.clone())
                .unwrap_or_default(),
            quality_score: session.analysis.as_ref().map_or(0, |a| a.quality_score),
            improvement_count: session
                .enhancement
                .as_ref()
                .map_or(0, |e| e.improvements.len()),
        })
        .into_response(),
    }
}

/// Read-only report behind a share link.
pub async fn shared_report(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(report) = state.shares.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            render_page(ErrorTemplate {
                title: "Link expired",
                message: "This share link has expired or does not exist.",
            }),
        )
            .into_response();
    };

    render_page(SharedReportTemplate {
        title: "Shared report",
        doc_title: &report.doc_title,
        file_name: &report.file_name,
        shared_at: report.shared_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        analysis_html: templates::analysis_report(&report.analysis),
        improvements: &report.enhancement.improvements,
        has_improvements: !report.enhancement.improvements.is_empty(),
    })
    .into_response()
}
