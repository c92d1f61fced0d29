//! Text extraction and analysis from the command line.

use std::path::Path;

use console::style;

use super::super::helpers::truncate;
use crate::analysis::{ensure_sufficient, DocumentAnalyzer, LlmAnalyzer};
use crate::config::Settings;
use crate::extract::TextExtractor;
use crate::models::{ElementStatus, KnowledgeType};

async fn extract(settings: &Settings, file: &Path) -> anyhow::Result<String> {
    let extractor = TextExtractor::new().with_pdftotext(settings.pdftotext.clone());
    let path = file.to_path_buf();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&path)).await??;
    Ok(text)
}

/// Print extracted text.
pub async fn cmd_extract(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let text = extract(settings, file).await?;
    println!("{}", text);
    Ok(())
}

/// Extract, analyze and report on a document.
pub async fn cmd_analyze(
    settings: &Settings,
    file: &Path,
    doc_type: &str,
    json: bool,
) -> anyhow::Result<()> {
    let Some(kind) = KnowledgeType::get(doc_type) else {
        anyhow::bail!(
            "Unknown document type '{}'. Expected one of: {}",
            doc_type,
            KnowledgeType::ids().join(", ")
        );
    };

    let analyzer = LlmAnalyzer::new(settings.llm.clone())?;
    if !analyzer.is_available() {
        anyhow::bail!("{}", analyzer.unavailable_reason());
    }

    let text = extract(settings, file).await?;
    ensure_sufficient(&text)?;

    if !json {
        println!(
            "{} Analyzing {} as {} ({} chars)",
            style("→").cyan(),
            file.display(),
            kind.title,
            text.len()
        );
    }

    let analysis = analyzer
        .analyze(&text, kind)
        .await?
        .stamped(chrono::Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "\n{} {}%  ({} complete, {} partial, {} missing)\n",
        style("Quality score:").bold(),
        analysis.quality_score,
        analysis.summary.exists,
        analysis.summary.partial,
        analysis.summary.missing
    );

    for element in &analysis.elements {
        let marker = match element.status {
            ElementStatus::Exists => style("✓").green(),
            ElementStatus::Partial => style("~").yellow(),
            ElementStatus::Missing => style("✗").red(),
        };
        println!("  {} {:<32} {}", marker, element.name, truncate(&element.description, 60));
        if let Some(ref action) = element.action {
            println!("      {}", style(truncate(action, 70)).dim());
        }
    }

    if !analysis.recommendations.is_empty() {
        println!("\n{}", style("Recommendations:").bold());
        for r in &analysis.recommendations {
            println!("  - {}", r);
        }
    }

    Ok(())
}
