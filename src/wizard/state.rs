//! Per-browser wizard state.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Analysis, FileInfo, KnowledgeType};

/// The document attached to a session.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Extracted (or typed) text.
    pub content: String,
    pub info: FileInfo,
}

/// Result of the enhancement step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enhancement {
    pub original_text: String,
    pub improvements: Vec<String>,
    pub enhanced_at: DateTime<Utc>,
}

impl Enhancement {
    pub fn from_analysis(analysis: &Analysis, original_text: &str) -> Self {
        Self {
            original_text: original_text.to_string(),
            improvements: analysis.improvements(),
            enhanced_at: Utc::now(),
        }
    }
}

/// Everything the wizard remembers between requests.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    pub doc_type: Option<String>,
    pub file: Option<StoredFile>,
    pub analysis: Option<Analysis>,
    pub enhancement: Option<Enhancement>,
    /// One-shot message shown on the next rendered page.
    pub flash: Option<String>,
}

impl WizardSession {
    pub fn knowledge_type(&self) -> Option<&'static KnowledgeType> {
        self.doc_type.as_deref().and_then(KnowledgeType::get)
    }

    /// Record a type selection. Results graded against a different type
    /// no longer apply and are dropped.
    pub fn select_type(&mut self, id: &str) {
        if self.doc_type.as_deref() != Some(id) {
            self.analysis = None;
            self.enhancement = None;
        }
        self.doc_type = Some(id.to_string());
    }

    /// Attach a new document, invalidating anything derived from the old one.
    pub fn attach_file(&mut self, file: StoredFile) {
        self.file = Some(file);
        self.analysis = None;
        self.enhancement = None;
    }

    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed() -> WizardSession {
        WizardSession {
            doc_type: Some("bestPractices".to_string()),
            analysis: Some(Analysis::fallback(&["Scope"])),
            ..Default::default()
        }
    }

    #[test]
    fn test_reselecting_same_type_keeps_results() {
        let mut session = analyzed();
        session.select_type("bestPractices");
        assert!(session.analysis.is_some());
    }

    #[test]
    fn test_changing_type_drops_results() {
        let mut session = analyzed();
        session.select_type("engineeringReport");
        assert!(session.analysis.is_none());
        assert_eq!(session.knowledge_type().unwrap().title, "Engineering Report");
    }

    #[test]
    fn test_attach_file_resets_analysis() {
        let mut session = analyzed();
        session.attach_file(StoredFile {
            path: PathBuf::from("notes.txt"),
            content: String::new(),
            info: FileInfo::for_editor("notes.txt", ""),
        });
        assert!(session.file.is_some());
        assert!(session.analysis.is_none());
    }

    #[test]
    fn test_flash_is_one_shot() {
        let mut session = WizardSession {
            flash: Some("hello".to_string()),
            ..Default::default()
        };
        assert_eq!(session.take_flash().as_deref(), Some("hello"));
        assert!(session.take_flash().is_none());
    }
}
