//! Document analysis against the required elements of a knowledge type.
//!
//! [`DocumentAnalyzer`] is the seam between the web layer and whatever
//! grades the document. [`LlmAnalyzer`] is the production implementation.

mod parse;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{build_analysis_prompt, LlmClient, LlmConfig, LlmError, ANALYSIS_SYSTEM_PROMPT};
use crate::models::{Analysis, KnowledgeType};

pub use parse::{parse_model_output, strip_code_fences};

/// Minimum trimmed characters of content worth analyzing.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Errors from analysis backends.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Could not extract sufficient content from the document")]
    InsufficientContent,

    #[error("{0}")]
    Llm(#[from] LlmError),
}

/// Grades document text against a knowledge type.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Whether the analyzer can run at all (credentials present, enabled).
    fn is_available(&self) -> bool;

    /// Short message explaining why the analyzer is unavailable.
    fn unavailable_reason(&self) -> String {
        "Document analysis is not available".to_string()
    }

    async fn analyze(&self, content: &str, doc_type: &KnowledgeType) -> Result<Analysis, AnalysisError>;
}

/// Check that there is enough text to analyze.
pub fn ensure_sufficient(content: &str) -> Result<(), AnalysisError> {
    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        Err(AnalysisError::InsufficientContent)
    } else {
        Ok(())
    }
}

/// Analyzer backed by an LLM.
pub struct LlmAnalyzer {
    client: LlmClient,
}

impl LlmAnalyzer {
    pub fn new(config: LlmConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }
}

#[async_trait]
impl DocumentAnalyzer for LlmAnalyzer {
    fn is_available(&self) -> bool {
        self.client.config().is_configured()
    }

    fn unavailable_reason(&self) -> String {
        if !self.client.config().enabled {
            "LLM analysis is disabled (LLM_ENABLED=false)".to_string()
        } else {
            "LLM API key not configured. Please set OPENAI_API_KEY (or LLM_API_KEY) in the .env file"
                .to_string()
        }
    }

    async fn analyze(&self, content: &str, doc_type: &KnowledgeType) -> Result<Analysis, AnalysisError> {
        if !self.is_available() {
            return Err(AnalysisError::BackendNotAvailable(self.unavailable_reason()));
        }
        ensure_sufficient(content)?;

        let config = self.client.config();
        let prompt = build_analysis_prompt(
            config.get_analysis_prompt(),
            doc_type.title,
            doc_type.elements,
            self.client.truncate_content(content),
        );

        info!("Analyzing {} document ({} chars)", doc_type.id, content.len());
        let response = self
            .client
            .complete(ANALYSIS_SYSTEM_PROMPT, &prompt)
            .await?;

        match parse_model_output(&response) {
            Ok(analysis) => Ok(analysis),
            Err(e) => {
                warn!("Could not parse analysis response ({}); using fallback", e);
                Ok(Analysis::fallback(doc_type.elements))
            }
        }
    }
}
