//! Text extraction from uploaded documents.
//!
//! PDFs go through `pdftotext`; DOCX files are read directly from the
//! `word/document.xml` part of the zip container.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

use crate::utils::file_extension;

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File content does not match its .{0} extension")]
    ContentMismatch(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Check whether a filename has an uploadable extension.
pub fn allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Verify that sniffed content agrees with the declared extension.
pub fn check_content_type(content: &[u8], ext: &str) -> Result<(), ExtractionError> {
    let detected = infer::get(content).map(|k| k.mime_type());
    let ok = match ext {
        "pdf" => detected == Some("application/pdf"),
        "docx" => matches!(detected, Some(DOCX_MIME) | Some("application/zip")),
        other => return Err(ExtractionError::UnsupportedFileType(other.to_string())),
    };

    if ok {
        Ok(())
    } else {
        debug!("Sniffed {:?} for .{} upload", detected, ext);
        Err(ExtractionError::ContentMismatch(ext.to_string()))
    }
}

/// Text extractor that dispatches on file extension.
pub struct TextExtractor {
    pdftotext: String,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            pdftotext: "pdftotext".to_string(),
        }
    }
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `pdftotext` binary.
    pub fn with_pdftotext(mut self, binary: impl Into<String>) -> Self {
        self.pdftotext = binary.into();
        self
    }

    /// Whether PDF extraction is possible on this host.
    pub fn pdf_supported(&self) -> bool {
        which::which(&self.pdftotext).is_ok()
    }

    /// Extract plain text from a file.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let ext = file_extension(name).unwrap_or_default();

        match ext.as_str() {
            "pdf" => self.extract_pdf(path),
            "docx" => extract_docx(path),
            "txt" => Ok(std::fs::read_to_string(path)?),
            other => Err(ExtractionError::UnsupportedFileType(other.to_string())),
        }
    }

    fn extract_pdf(&self, path: &Path) -> Result<String, ExtractionError> {
        let result = Command::new(&self.pdftotext)
            .arg("-layout")
            .arg(path)
            .arg("-")
            .output();

        match result {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => Err(ExtractionError::ExtractionFailed(format!(
                "pdftotext failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractionError::ToolNotFound(self.pdftotext.clone()))
            }
            Err(e) => Err(ExtractionError::Io(e)),
        }
    }
}

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p[ >].*?</w:p>").unwrap());

static RUN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>|<w:cr/>").unwrap()
});

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").unwrap());

fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::ExtractionFailed(format!("not a Word document: {}", e)))?
        .read_to_string(&mut xml)?;

    Ok(docx_xml_to_text(&xml))
}

/// Flatten WordprocessingML body XML to text, one line per paragraph.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();

    for paragraph in PARAGRAPH.find_iter(xml) {
        for token in RUN_TOKEN.captures_iter(paragraph.as_str()) {
            match token.get(1) {
                Some(run) => text.push_str(&decode_entities(run.as_str())),
                None if token[0].starts_with("<w:tab") => text.push('\t'),
                None => text.push('\n'),
            }
        }
        text.push('\n');
    }

    text
}

fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => entity[1..].parse().ok().and_then(char::from_u32),
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
