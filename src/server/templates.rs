//! HTML fragments returned alongside JSON responses.
//!
//! The browser script splices these into the page as-is, so every value
//! taken from a document, a model answer or a file name is escaped here.

use crate::models::{Analysis, ElementReport, ElementStatus, FileInfo};
use crate::utils::{format_mib, html_escape};

/// Legend explaining the three element states.
fn status_legend() -> String {
    let items: String = [
        ElementStatus::Exists,
        ElementStatus::Partial,
        ElementStatus::Missing,
    ]
    .iter()
    .map(|status| {
        format!(
            r#"<span class="legend-item"><i class="fas {} {}"></i> {}</span>"#,
            status.icon(),
            status.color(),
            status.label()
        )
    })
    .collect();

    format!(r#"<div class="status-legend">{}</div>"#, items)
}

fn summary_card(value: &str, label: &str, color: &str) -> String {
    format!(
        r#"
        <div class="summary-card">
            <div class="summary-value {}">{}</div>
            <div class="summary-label">{}</div>
        </div>"#,
        color, value, label
    )
}

fn element_card(index: usize, element: &ElementReport) -> String {
    let action = element
        .action
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| {
            format!(
                r#"
            <div class="element-action">
                <strong>Action Required:</strong> {}
            </div>"#,
                html_escape(a)
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <div class="element-card status-{}" style="animation-delay: {:.1}s">
            <div class="element-header">
                <i class="fas {} {}"></i>
                <h4>{}</h4>
                <span class="element-status {}">{}</span>
            </div>
            <p class="element-description">{}</p>{}
        </div>"#,
        element.status.as_str(),
        index as f64 * 0.1,
        element.status.icon(),
        element.status.color(),
        html_escape(&element.name),
        element.status.color(),
        element.status.label(),
        html_escape(&element.description),
        action
    )
}

/// Render the full analysis report.
pub fn analysis_report(analysis: &Analysis) -> String {
    let summary = &analysis.summary;
    let cards = [
        summary_card(&summary.exists.to_string(), "Complete", "text-green-600"),
        summary_card(&summary.partial.to_string(), "Partial", "text-yellow-600"),
        summary_card(&summary.missing.to_string(), "Missing", "text-red-600"),
        summary_card(
            &format!("{}%", analysis.quality_score),
            "Quality Score",
            "text-blue-600",
        ),
    ]
    .concat();

    let elements: String = analysis
        .elements
        .iter()
        .enumerate()
        .map(|(i, e)| element_card(i, e))
        .collect();

    let recommendations = if analysis.recommendations.is_empty() {
        String::new()
    } else {
        let items: String = analysis
            .recommendations
            .iter()
            .map(|r| format!("<li>{}</li>", html_escape(r)))
            .collect();
        format!(
            r#"
    <div class="recommendations">
        <h3><i class="fas fa-lightbulb"></i> Recommendations</h3>
        <ul>{}</ul>
    </div>"#,
            items
        )
    };

    format!(
        r#"
<div class="analysis-report">
    {}
    <div class="summary-cards">{}
    </div>
    <div class="element-list">{}
    </div>{}
</div>"#,
        status_legend(),
        cards,
        elements,
        recommendations
    )
}

/// Current-file line shown under the upload zone.
pub fn upload_status(info: &FileInfo) -> String {
    format!(
        r#"<div class="file-info"><i class="fas fa-file-alt"></i> <strong>Current File:</strong> <span class="file-name">{} ({}MB)</span></div>"#,
        html_escape(&info.name),
        format_mib(info.size)
    )
}

/// Panel shown in place of results when something went wrong.
pub fn failure_panel(title: &str, message: &str) -> String {
    format!(
        r#"
<div class="failure-panel">
    <i class="fas fa-exclamation-triangle text-red-600"></i>
    <h3>{}</h3>
    <p>{}</p>
</div>"#,
        html_escape(title),
        html_escape(message)
    )
}

/// Spinner with a message, shown while a request is in flight.
pub fn loading_panel(message: &str) -> String {
    format!(
        r#"
<div class="loading-panel">
    <div class="spinner"></div>
    <p>{}</p>
</div>"#,
        html_escape(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: ElementStatus, action: Option<&str>) -> ElementReport {
        ElementReport {
            name: "Scope".to_string(),
            status,
            description: "Covers <b>scope</b>".to_string(),
            action: action.map(str::to_string),
        }
    }

    #[test]
    fn test_analysis_report_summary_cards() {
        let analysis = Analysis::new(
            vec![
                report(ElementStatus::Exists, None),
                report(ElementStatus::Partial, Some("Expand it")),
                report(ElementStatus::Missing, Some("Write it")),
            ],
            72,
            vec!["Add references".to_string()],
        );
        let html = analysis_report(&analysis);

        assert!(html.contains("72%"));
        assert!(html.contains("Quality Score"));
        assert_eq!(html.matches("Action Required").count(), 2);
        assert!(html.contains("Recommendations"));
        assert!(html.contains("<li>Add references</li>"));
        assert!(html.contains("animation-delay: 0.2s"));
    }

    #[test]
    fn test_analysis_report_escapes_model_text() {
        let analysis = Analysis::new(vec![report(ElementStatus::Exists, None)], 90, vec![]);
        let html = analysis_report(&analysis);
        assert!(html.contains("Covers &lt;b&gt;scope&lt;/b&gt;"));
        assert!(!html.contains("<b>scope</b>"));
    }

    #[test]
    fn test_no_recommendations_block_when_empty() {
        let analysis = Analysis::new(vec![report(ElementStatus::Missing, Some("  "))], 10, vec![]);
        let html = analysis_report(&analysis);
        assert!(!html.contains("Recommendations"));
        assert!(!html.contains("Action Required"));
        assert!(html.contains("fa-times-circle"));
    }

    #[test]
    fn test_upload_status_formats_mib() {
        let info = FileInfo::for_upload("report.pdf", "pdf", &vec![0u8; 1536 * 1024]);
        let html = upload_status(&info);
        assert!(html.contains("Current File:"));
        assert!(html.contains("report.pdf (1.50MB)"));
    }

    #[test]
    fn test_failure_panel_escapes() {
        let html = failure_panel("Analysis failed", "<script>");
        assert!(html.contains("&lt;script&gt;"));
    }
}
