//! Web server for the document wizard.
//!
//! Serves the five wizard pages, the JSON API the browser script talks to,
//! and read-only share links. Wizard state lives server-side, keyed by a
//! session cookie.

mod assets;
mod cache;
mod handlers;
mod routes;
mod session;
mod shares;
mod template_structs;
mod templates;

pub use routes::create_router;
pub use session::{SessionHandle, SessionStore, SESSION_COOKIE};
pub use shares::{ShareStore, SharedReport};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{DocumentAnalyzer, LlmAnalyzer};
use crate::config::Settings;
use crate::extract::TextExtractor;

/// How often expired sessions and share links are dropped.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionStore>,
    pub shares: Arc<ShareStore>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
    pub extractor: Arc<TextExtractor>,
}

impl AppState {
    /// State backed by the configured LLM.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let analyzer = LlmAnalyzer::new(settings.llm.clone())?;
        Ok(Self::with_analyzer(settings, Arc::new(analyzer)))
    }

    /// State with a caller-provided analyzer.
    pub fn with_analyzer(settings: &Settings, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self {
            settings: Arc::new(settings.clone()),
            sessions: Arc::new(SessionStore::new(settings.session_ttl)),
            shares: Arc::new(ShareStore::new(settings.share_ttl)),
            analyzer,
            extractor: Arc::new(TextExtractor::new().with_pdftotext(settings.pdftotext.clone())),
        }
    }
}

fn spawn_purge_task(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let expired = state.sessions.purge_expired();
            let shares = state.shares.purge_expired();
            let uploads = remove_session_uploads(&state.settings.upload_dir, &expired).await;
            if !expired.is_empty() || shares > 0 {
                tracing::debug!(
                    "Purged {} expired sessions ({} upload directories) and {} expired share links",
                    expired.len(),
                    uploads,
                    shares
                );
            }
        }
    });
}

/// Delete the upload directories of expired sessions, returning how many
/// existed.
async fn remove_session_uploads(upload_dir: &Path, session_ids: &[String]) -> usize {
    let mut removed = 0;
    for id in session_ids {
        let dir = upload_dir.join(id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", dir.display(), e),
        }
    }
    removed
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let state = AppState::new(settings)?;
    if !state.analyzer.is_available() {
        tracing::warn!("{}", state.analyzer.unavailable_reason());
    }
    if !state.extractor.pdf_supported() {
        tracing::warn!(
            "{} not found in PATH; PDF uploads will have no extracted text",
            settings.pdftotext
        );
    }

    spawn_purge_task(state.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
