//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `format`: Human-readable formatting (sizes, word counts)
//! - `filename`: Upload filename sanitizing

mod filename;
mod format;
mod html;

pub use filename::{file_extension, secure_filename};
pub use format::{format_mib, format_size, word_count};
pub use html::html_escape;
