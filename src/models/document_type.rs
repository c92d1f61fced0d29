//! Catalog of knowledge document types.
//!
//! Each type names the sections a well-formed document of that kind is
//! expected to contain. Analysis grades an upload against this list.

use serde::Serialize;

/// A selectable document category.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnowledgeType {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "templateFile")]
    pub template_file: &'static str,
    #[serde(rename = "sampleFile")]
    pub sample_file: &'static str,
    pub elements: &'static [&'static str],
}

const CATALOG: &[KnowledgeType] = &[
    KnowledgeType {
        id: "bestPractices",
        title: "Best Practices",
        description: "Document proven methods and techniques that deliver superior results.",
        template_file: "templates/best_practices_template.docx",
        sample_file: "samples/best_practices_sample.docx",
        elements: &[
            "Executive Summary",
            "Introduction",
            "Scope and Context",
            "Best Practice Description",
            "Implementation Guidelines",
            "Benefits and Outcomes",
            "Supporting Evidence",
            "Recommendations",
            "Conclusion",
        ],
    },
    KnowledgeType {
        id: "lessonsLearned",
        title: "Lessons Learned",
        description: "Capture insights from projects and experiences for future reference.",
        template_file: "templates/lessons_learned_template.docx",
        sample_file: "samples/lessons_learned_sample.docx",
        elements: &[
            "Executive Summary",
            "Project Background",
            "Problem Statement",
            "What Went Well",
            "What Went Wrong",
            "Root Cause Analysis",
            "Lessons Learned",
            "Recommendations",
            "Action Items",
        ],
    },
    KnowledgeType {
        id: "engineeringReport",
        title: "Engineering Report",
        description: "Create formal technical reports with comprehensive analysis.",
        template_file: "templates/engineering_report_template.docx",
        sample_file: "samples/engineering_report_sample.docx",
        elements: &[
            "Title Page",
            "Abstract",
            "Table of Contents",
            "Introduction",
            "Methodology",
            "Results and Analysis",
            "Discussion",
            "Conclusions",
            "Recommendations",
            "References",
        ],
    },
    KnowledgeType {
        id: "engineeringStandards",
        title: "Engineering Standards",
        description:
            "Authoritative documents for technical criteria, methods, and practices in engineering.",
        template_file: "templates/engineering_standards_template.docx",
        sample_file: "samples/engineering_standards_sample.docx",
        elements: &[
            "Title and Identification",
            "Scope",
            "Normative References",
            "Terms and Definitions",
            "Technical Requirements",
            "Test Methods",
            "Compliance Criteria",
            "Quality Assurance",
            "Documentation Requirements",
        ],
    },
];

impl KnowledgeType {
    /// All types in display order.
    pub fn all() -> &'static [KnowledgeType] {
        CATALOG
    }

    /// Look up a type by its id (case-sensitive, as posted by the browser).
    pub fn get(id: &str) -> Option<&'static KnowledgeType> {
        CATALOG.iter().find(|t| t.id == id)
    }

    /// Catalog ids, for CLI help and error messages.
    pub fn ids() -> Vec<&'static str> {
        CATALOG.iter().map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let t = KnowledgeType::get("lessonsLearned").unwrap();
        assert_eq!(t.title, "Lessons Learned");
        assert_eq!(t.elements.len(), 9);
        assert!(KnowledgeType::get("lessonslearned").is_none());
        assert!(KnowledgeType::get("").is_none());
    }

    #[test]
    fn test_catalog_order() {
        assert_eq!(
            KnowledgeType::ids(),
            vec![
                "bestPractices",
                "lessonsLearned",
                "engineeringReport",
                "engineeringStandards"
            ]
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(KnowledgeType::get("engineeringReport").unwrap()).unwrap();
        assert_eq!(json["templateFile"], "templates/engineering_report_template.docx");
        assert_eq!(json["elements"].as_array().unwrap().len(), 10);
    }
}
