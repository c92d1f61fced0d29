//! Prompt text for element-based document review.

/// System message sent with every analysis request.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a technical document analyst. Analyze documents by evaluating the presence and quality of required elements. Always respond with valid JSON.";

/// Default analysis prompt. Placeholders: `{title}`, `{elements}`, `{content}`.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"Analyze this {title} document and evaluate the following required elements.
For each element, determine its status: EXISTS (complete and well-documented), PARTIAL (present but needs improvement), or MISSING (completely absent).

Required Elements to Check:
{elements}

For each element, provide:
1. Status (EXISTS, PARTIAL, or MISSING)
2. Brief description of what you found (or what's missing)
3. Specific action needed to improve (if PARTIAL or MISSING)

Also provide:
- Overall quality score (0-100)
- 3-5 overall recommendations for the document

Format your response as JSON:
{
    "elements": [
        {
            "name": "Element Name",
            "status": "EXISTS|PARTIAL|MISSING",
            "description": "What was found or what's missing",
            "action": "What needs to be done (if applicable)"
        }
    ],
    "quality_score": 75,
    "recommendations": ["Recommendation 1", "Recommendation 2"]
}

Document Content:
{content}"#;

/// Fill the analysis prompt template.
pub fn build_analysis_prompt(template: &str, title: &str, elements: &[&str], content: &str) -> String {
    let element_list = elements
        .iter()
        .map(|e| format!("- {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    // Content goes last so braces inside the document are never re-substituted.
    template
        .replace("{title}", title)
        .replace("{elements}", &element_list)
        .replace("{content}", content)
}
