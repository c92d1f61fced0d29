//! Askama template structs for the wizard pages.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Fragments that are also returned over the API (analysis report, upload
//! status) are rendered by `templates` and embedded with `|safe`.

use askama::Template;

use crate::models::KnowledgeType;
use crate::wizard::{WizardSession, WizardStep};

/// One entry of the progress bar.
pub struct StepNav {
    pub number: u8,
    pub title: &'static str,
    /// `active`, `done` or empty.
    pub state: &'static str,
}

impl StepNav {
    pub fn for_current(current: WizardStep) -> Vec<Self> {
        WizardStep::all()
            .into_iter()
            .map(|step| StepNav {
                number: step.number(),
                title: step.title(),
                state: if step == current {
                    "active"
                } else if step < current {
                    "done"
                } else {
                    ""
                },
            })
            .collect()
    }
}

/// Selectable document type card.
pub struct TypeCard {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub element_count: usize,
    pub selected: bool,
}

impl TypeCard {
    pub fn catalog(selected: Option<&str>) -> Vec<Self> {
        KnowledgeType::all()
            .iter()
            .map(|t| TypeCard {
                id: t.id,
                title: t.title,
                description: t.description,
                element_count: t.elements.len(),
                selected: selected == Some(t.id),
            })
            .collect()
    }
}

/// Fields every wizard page shares with `base.html`.
pub struct PageChrome {
    pub step: u8,
    pub steps: Vec<StepNav>,
    pub has_flash: bool,
    pub flash_val: String,
    pub doc_title: String,
}

impl PageChrome {
    pub fn new(step: WizardStep, session: &WizardSession, flash: Option<String>) -> Self {
        Self {
            step: step.number(),
            steps: StepNav::for_current(step),
            has_flash: flash.is_some(),
            flash_val: flash.unwrap_or_default(),
            doc_title: session
                .knowledge_type()
                .map(|t| t.title.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Step 1: choose a document type.
#[derive(Template)]
#[template(path = "steps/step1.html")]
pub struct SelectTypeTemplate<'a> {
    pub title: &'a str,
    pub chrome: PageChrome,
    pub types: Vec<TypeCard>,
    pub has_selection: bool,
}

/// Step 2: upload a file or write in the editor.
#[derive(Template)]
#[template(path = "steps/step2.html")]
pub struct UploadTemplate<'a> {
    pub title: &'a str,
    pub chrome: PageChrome,
    pub has_file: bool,
    pub file_status_html: String,
    pub editor_text: String,
    pub template_url: String,
    pub sample_url: String,
}

/// Step 3: run and view the analysis.
#[derive(Template)]
#[template(path = "steps/step3.html")]
pub struct AnalysisTemplate<'a> {
    pub title: &'a str,
    pub chrome: PageChrome,
    pub file_status_html: String,
    pub has_analysis: bool,
    pub analysis_html: String,
    pub loading_html: String,
}

/// Step 4: review improvement items.
#[derive(Template)]
#[template(path = "steps/step4.html")]
pub struct EnhanceTemplate<'a> {
    pub title: &'a str,
    pub chrome: PageChrome,
    pub quality_score: u8,
    pub has_enhancement: bool,
    pub improvements: Vec<String>,
}

/// Step 5: create a share link.
#[derive(Template)]
#[template(path = "steps/step5.html")]
pub struct ShareTemplate<'a> {
    pub title: &'a str,
    pub chrome: PageChrome,
    pub file_name: String,
    pub quality_score: u8,
    pub improvement_count: usize,
}

/// Read-only report opened from a share link.
#[derive(Template)]
#[template(path = "shared.html")]
pub struct SharedReportTemplate<'a> {
    pub title: &'a str,
    pub doc_title: &'a str,
    pub file_name: &'a str,
    pub shared_at: String,
    pub analysis_html: String,
    pub improvements: &'a [String],
    pub has_improvements: bool,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
