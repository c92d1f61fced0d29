//! docwizard - guided document quality analysis.
//!
//! Walks a user through choosing a knowledge document type, uploading or
//! writing the document, and reviewing an element-by-element analysis of
//! how well it covers the sections that type calls for.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod server;
pub mod utils;
pub mod wizard;
