//! Data models for docwizard.

mod analysis;
mod document_type;
mod file_info;

pub use analysis::{Analysis, ElementReport, ElementStatus, StatusSummary};
pub use document_type::KnowledgeType;
pub use file_info::{FileInfo, FileSource};
