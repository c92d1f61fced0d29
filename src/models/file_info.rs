//! Metadata about the document attached to a wizard session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where the document content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSource {
    Upload,
    Editor,
}

/// File metadata returned to the browser after an upload or editor save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub source: FileSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    pub sha256: String,
}

impl FileInfo {
    /// Describe an uploaded file.
    pub fn for_upload(name: &str, file_type: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            size: content.len() as u64,
            file_type: file_type.to_string(),
            uploaded_at: Utc::now(),
            source: FileSource::Upload,
            word_count: None,
            sha256: hex::encode(Sha256::digest(content)),
        }
    }

    /// Describe text written in the browser editor.
    pub fn for_editor(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            size: text.len() as u64,
            file_type: "editor".to_string(),
            uploaded_at: Utc::now(),
            source: FileSource::Editor,
            word_count: Some(crate::utils::word_count(text)),
            sha256: hex::encode(Sha256::digest(text.as_bytes())),
        }
    }
}
