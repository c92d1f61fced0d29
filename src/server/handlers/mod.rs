//! HTTP request handlers for the web server.

mod analysis;
mod api;
mod downloads;
mod helpers;
mod pages;
mod static_files;
mod upload;

// Re-export handlers for use by the router
pub use analysis::analyze;
pub use api::{api_types, enhance, health, next_step, select_type, share};
pub use downloads::{download_sample, download_template};
pub use pages::{index, shared_report, step_page};
pub use static_files::{serve_css, serve_js};
pub use upload::{save_editor_content, upload};
