//! Element-by-element analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How completely a required element is covered by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum ElementStatus {
    Exists,
    Partial,
    Missing,
}

impl ElementStatus {
    /// Parse a status label. Anything unrecognized counts as missing.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "exists" | "exist" | "present" | "complete" => Self::Exists,
            "partial" => Self::Partial,
            _ => Self::Missing,
        }
    }

    /// Lowercase label, used as a CSS class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Partial => "partial",
            Self::Missing => "missing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exists => "EXISTS",
            Self::Partial => "PARTIAL",
            Self::Missing => "MISSING",
        }
    }

    /// Font Awesome icon class for the status.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Exists => "fa-check-circle",
            Self::Partial => "fa-exclamation-circle",
            Self::Missing => "fa-times-circle",
        }
    }

    /// Text color class for the status icon.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Exists => "text-green-600",
            Self::Partial => "text-yellow-600",
            Self::Missing => "text-red-600",
        }
    }
}

impl From<String> for ElementStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Review of one required element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementReport {
    pub name: String,
    pub status: ElementStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Per-status element counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub exists: usize,
    pub partial: usize,
    pub missing: usize,
}

impl StatusSummary {
    pub fn from_elements(elements: &[ElementReport]) -> Self {
        elements
            .iter()
            .fold(Self::default(), |mut acc, e| {
                match e.status {
                    ElementStatus::Exists => acc.exists += 1,
                    ElementStatus::Partial => acc.partial += 1,
                    ElementStatus::Missing => acc.missing += 1,
                }
                acc
            })
    }
}

/// A complete document analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub elements: Vec<ElementReport>,
    pub quality_score: u8,
    pub recommendations: Vec<String>,
    pub summary: StatusSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Elements reported when the model's answer could not be understood.
const FALLBACK_ELEMENT_COUNT: usize = 5;

impl Analysis {
    /// Build an analysis, deriving the summary from the elements.
    pub fn new(elements: Vec<ElementReport>, quality_score: u8, recommendations: Vec<String>) -> Self {
        let summary = StatusSummary::from_elements(&elements);
        Self {
            elements,
            quality_score: quality_score.min(100),
            recommendations,
            summary,
            analyzed_at: None,
        }
    }

    /// Placeholder analysis asking the user to retry.
    pub fn fallback(expected_elements: &[&str]) -> Self {
        let elements = expected_elements
            .iter()
            .take(FALLBACK_ELEMENT_COUNT)
            .map(|name| ElementReport {
                name: name.to_string(),
                status: ElementStatus::Partial,
                description: "Unable to analyze - please try again".to_string(),
                action: Some("Re-run the analysis to get detailed feedback".to_string()),
            })
            .collect();

        Self::new(
            elements,
            50,
            vec![
                "Ensure all required sections are present".to_string(),
                "Add more detailed content to each section".to_string(),
                "Include supporting evidence and examples".to_string(),
            ],
        )
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.analyzed_at = Some(at);
        self
    }

    /// Actionable improvement items: actions of incomplete elements, or the
    /// overall recommendations when no element carries one.
    pub fn improvements(&self) -> Vec<String> {
        let actions: Vec<String> = self
            .elements
            .iter()
            .filter(|e| e.status != ElementStatus::Exists)
            .filter_map(|e| {
                e.action
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(|a| format!("{}: {}", e.name, a))
            })
            .collect();

        if actions.is_empty() {
            self.recommendations.clone()
        } else {
            actions
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, status: ElementStatus, action: Option<&str>) -> ElementReport {
        ElementReport {
            name: name.to_string(),
            status,
            description: String::new(),
            action: action.map(String::from),
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ElementStatus::parse("EXISTS"), ElementStatus::Exists);
        assert_eq!(ElementStatus::parse(" partial "), ElementStatus::Partial);
        assert_eq!(ElementStatus::parse("Missing"), ElementStatus::Missing);
        assert_eq!(ElementStatus::parse("unknown"), ElementStatus::Missing);
    }

    #[test]
    fn test_status_serde() {
        let s: ElementStatus = serde_json::from_str("\"Partial\"").unwrap();
        assert_eq!(s, ElementStatus::Partial);
        assert_eq!(serde_json::to_string(&ElementStatus::Exists).unwrap(), "\"EXISTS\"");
    }

    #[test]
    fn test_summary_counts() {
        let analysis = Analysis::new(
            vec![
                element("A", ElementStatus::Exists, None),
                element("B", ElementStatus::Partial, None),
                element("C", ElementStatus::Missing, None),
                element("D", ElementStatus::Missing, None),
            ],
            120,
            vec![],
        );
        assert_eq!(
            analysis.summary,
            StatusSummary {
                exists: 1,
                partial: 1,
                missing: 2
            }
        );
        assert_eq!(analysis.quality_score, 100);
    }

    #[test]
    fn test_fallback_takes_first_five() {
        let expected = ["a", "b", "c", "d", "e", "f", "g"];
        let analysis = Analysis::fallback(&expected);
        assert_eq!(analysis.elements.len(), 5);
        assert_eq!(analysis.summary.partial, 5);
        assert_eq!(analysis.quality_score, 50);
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[test]
    fn test_improvements_prefer_actions() {
        let analysis = Analysis::new(
            vec![
                element("Scope", ElementStatus::Exists, Some("ignored")),
                element("Methods", ElementStatus::Missing, Some("Add a methods section")),
                element("Results", ElementStatus::Partial, Some("  ")),
            ],
            60,
            vec!["General advice".to_string()],
        );
        assert_eq!(analysis.improvements(), vec!["Methods: Add a methods section"]);

        let clean = Analysis::new(
            vec![element("Scope", ElementStatus::Exists, None)],
            95,
            vec!["Polish wording".to_string()],
        );
        assert_eq!(clean.improvements(), vec!["Polish wording"]);
    }
}
