//! LLM integration for document analysis.

mod client;

pub use client::{
    build_analysis_prompt, truncate_at_boundary, LlmClient, LlmConfig, LlmError, LlmProvider,
    ANALYSIS_SYSTEM_PROMPT,
};
