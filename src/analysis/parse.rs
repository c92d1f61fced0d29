//! Parsing of model answers into [`Analysis`] values.
//!
//! Models wrap JSON in markdown fences, add prose around it, and drift
//! between field names. The canonical shape is
//! `elements`/`quality_score`/`recommendations`; `structure` and
//! `suggestions` are accepted as older spellings.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Analysis, ElementReport, ElementStatus};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no elements in response")]
    NoElements,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default, alias = "structure")]
    elements: Vec<RawElement>,
    #[serde(default)]
    quality_score: Option<Value>,
    #[serde(default, alias = "suggestions")]
    recommendations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default, alias = "element", alias = "section")]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    action: Option<String>,
}

/// Pull the JSON payload out of a model response.
pub fn strip_code_fences(response: &str) -> &str {
    let body = if let Some((_, rest)) = response.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = response.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        response
    };

    let body = body.trim();
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}

/// Parse a model response into an analysis.
pub fn parse_model_output(response: &str) -> Result<Analysis, ParseError> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fences(response))?;

    let elements: Vec<ElementReport> = raw
        .elements
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .map(|e| ElementReport {
            name: e.name.trim().to_string(),
            status: ElementStatus::parse(&e.status),
            description: e.description.trim().to_string(),
            action: e
                .action
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        })
        .collect();

    if elements.is_empty() {
        return Err(ParseError::NoElements);
    }

    let recommendations = raw
        .recommendations
        .into_iter()
        .filter_map(|r| match r {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(Analysis::new(
        elements,
        score_from_value(raw.quality_score.as_ref()),
        recommendations,
    ))
}

fn score_from_value(value: Option<&Value>) -> u8 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    score.map(|s| s.round().clamp(0.0, 100.0) as u8).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```\ntrailer"), "{\"a\":1}");
        assert_eq!(strip_code_fences("Here you go: {\"a\":1} hope it helps"), "{\"a\":1}");
        assert_eq!(strip_code_fences("no json"), "no json");
    }

    #[test]
    fn test_parse_canonical_shape() {
        let response = r#"```json
        {
            "elements": [
                {"name": "Abstract", "status": "EXISTS", "description": "Clear abstract"},
                {"name": "Methodology", "status": "partial", "description": "Thin", "action": "Describe the test rig"},
                {"name": "References", "status": "MISSING", "description": "None", "action": ""}
            ],
            "quality_score": 72.6,
            "recommendations": ["Add references", "Expand methodology"],
            "summary": {"exists": 99, "partial": 0, "missing": 0}
        }
        ```"#;

        let analysis = parse_model_output(response).unwrap();
        assert_eq!(analysis.elements.len(), 3);
        assert_eq!(analysis.quality_score, 73);
        assert_eq!(analysis.summary.exists, 1);
        assert_eq!(analysis.summary.partial, 1);
        assert_eq!(analysis.summary.missing, 1);
        assert_eq!(analysis.elements[1].action.as_deref(), Some("Describe the test rig"));
        assert!(analysis.elements[2].action.is_none());
        assert_eq!(analysis.recommendations.len(), 2);
    }

    #[test]
    fn test_parse_legacy_field_names() {
        let response = r#"{
            "structure": [{"section": "Scope", "status": "Exists"}],
            "quality_score": "88%",
            "suggestions": ["Tighten scope", {"text": "structured"}, null]
        }"#;

        let analysis = parse_model_output(response).unwrap();
        assert_eq!(analysis.elements[0].name, "Scope");
        assert_eq!(analysis.quality_score, 88);
        assert_eq!(
            analysis.recommendations,
            vec!["Tighten scope".to_string(), "{\"text\":\"structured\"}".to_string()]
        );
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_model_output("I could not read the document."),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            parse_model_output(r#"{"elements": [], "quality_score": 40}"#),
            Err(ParseError::NoElements)
        ));
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(score_from_value(Some(&serde_json::json!(140))), 100);
        assert_eq!(score_from_value(Some(&serde_json::json!(-3))), 0);
        assert_eq!(score_from_value(None), 0);
    }
}
