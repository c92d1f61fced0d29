//! Wizard step sequencing.
//!
//! The wizard is a fixed linear flow. Each step may only be entered once
//! the session holds what the earlier steps produce; these rules are
//! checked both when a page is requested and when the browser asks to
//! advance.

mod state;

use std::sync::LazyLock;

use regex::Regex;

pub use state::{Enhancement, StoredFile, WizardSession};

/// First and last wizard steps.
pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 5;

/// Named wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    SelectType = 1,
    Upload = 2,
    Analysis = 3,
    Enhance = 4,
    Share = 5,
}

impl WizardStep {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::SelectType),
            2 => Some(Self::Upload),
            3 => Some(Self::Analysis),
            4 => Some(Self::Enhance),
            5 => Some(Self::Share),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SelectType => "Select Document Type",
            Self::Upload => "Upload Document",
            Self::Analysis => "Analysis",
            Self::Enhance => "Enhance",
            Self::Share => "Share",
        }
    }

    pub fn all() -> [WizardStep; 5] {
        [
            Self::SelectType,
            Self::Upload,
            Self::Analysis,
            Self::Enhance,
            Self::Share,
        ]
    }
}

static STEP_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/step/(\d+)").unwrap());

/// Step number encoded in a URL path (`/step/<n>`), defaulting to 1.
pub fn step_from_path(path: &str) -> u8 {
    STEP_PATH
        .captures(path)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(FIRST_STEP)
}

/// Outcome of requesting a wizard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAccess {
    /// Render the requested step.
    Allow(WizardStep),
    /// Redirect to the start of the wizard.
    Restart,
    /// Redirect to an earlier step with a message.
    Redirect { step: WizardStep, message: &'static str },
}

/// Decide whether `step` may be shown for this session.
pub fn check_page(step: i64, session: &WizardSession) -> PageAccess {
    let Some(step) = u8::try_from(step).ok().and_then(WizardStep::from_number) else {
        return PageAccess::Restart;
    };

    if step > WizardStep::SelectType && session.doc_type.is_none() {
        return PageAccess::Redirect {
            step: WizardStep::SelectType,
            message: "Please select a document type first",
        };
    }
    if step > WizardStep::Upload && session.file.is_none() {
        return PageAccess::Redirect {
            step: WizardStep::Upload,
            message: "Please upload or create a document first",
        };
    }
    if step > WizardStep::Analysis && session.analysis.is_none() {
        return PageAccess::Redirect {
            step: WizardStep::Analysis,
            message: "Please complete the analysis first",
        };
    }
    if step > WizardStep::Enhance && session.enhancement.is_none() {
        return PageAccess::Redirect {
            step: WizardStep::Enhance,
            message: "Please complete the enhancement first",
        };
    }

    PageAccess::Allow(step)
}

/// Why the wizard refused to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdvanceError {
    #[error("Invalid step")]
    InvalidStep,
    #[error("Please select a document type first")]
    NoDocumentType,
    #[error("Please upload a file first")]
    NoFile,
    #[error("Analysis not completed")]
    AnalysisIncomplete,
    #[error("Enhancement not completed")]
    EnhancementIncomplete,
}

/// Compute the step that follows `current`, if the session allows it.
pub fn advance(current: i64, session: &WizardSession) -> Result<u8, AdvanceError> {
    let step = u8::try_from(current)
        .ok()
        .and_then(WizardStep::from_number)
        .ok_or(AdvanceError::InvalidStep)?;

    match step {
        WizardStep::SelectType if session.doc_type.is_none() => {
            return Err(AdvanceError::NoDocumentType)
        }
        WizardStep::Upload if session.file.is_none() => return Err(AdvanceError::NoFile),
        WizardStep::Analysis if session.file.is_none() => return Err(AdvanceError::NoFile),
        WizardStep::Analysis if session.analysis.is_none() => {
            return Err(AdvanceError::AnalysisIncomplete)
        }
        WizardStep::Enhance if session.enhancement.is_none() => {
            return Err(AdvanceError::EnhancementIncomplete)
        }
        _ => {}
    }

    Ok((step.number() + 1).min(LAST_STEP))
}
