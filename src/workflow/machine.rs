//! Workflow step machine
//!
//! `transition` is the single authority on which events each step accepts.
//! It is pure: guards that depend on event payloads (non-empty repository,
//! non-empty selection) are checked by the reducer after legality.

use strum_macros::{Display, EnumIter};

use super::events::WorkflowEvent;
use crate::error::IllegalTransition;

/// The five workflow steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Step {
    /// Waiting for repository coordinates
    #[default]
    Idle,
    /// List-files request in flight
    FetchingFiles,
    /// Tree loaded, user is choosing files
    SelectingFiles,
    /// Generate-document request in flight
    Analyzing,
    /// Document available
    Complete,
}

impl Step {
    /// A request is in flight; duplicate submissions must be refused
    pub fn is_busy(self) -> bool {
        matches!(self, Self::FetchingFiles | Self::Analyzing)
    }

    /// Heading shown to the user for this step
    pub fn title(self) -> &'static str {
        match self {
            Self::Idle => "Step 1: Enter Repository Details",
            Self::FetchingFiles => "Fetching repository files...",
            Self::SelectingFiles => "Step 2: Select Files to Analyze",
            Self::Analyzing => "Analyzing selected files...",
            Self::Complete => "Step 3: Review Analysis Results",
        }
    }
}

/// Next step for `event` in `step`, or `IllegalTransition`
pub fn transition(step: Step, event: &WorkflowEvent) -> Result<Step, IllegalTransition> {
    let next = match (step, event) {
        (Step::Idle, WorkflowEvent::Submit { .. }) => Step::FetchingFiles,

        (Step::FetchingFiles, WorkflowEvent::FilesFetched { .. }) => Step::SelectingFiles,
        (Step::FetchingFiles, WorkflowEvent::FetchFailed { .. }) => Step::Idle,

        (
            Step::SelectingFiles,
            WorkflowEvent::ToggleFile { .. } | WorkflowEvent::SelectAll | WorkflowEvent::DeselectAll,
        ) => Step::SelectingFiles,
        (Step::SelectingFiles, WorkflowEvent::Analyze) => Step::Analyzing,

        (Step::Analyzing, WorkflowEvent::AnalysisSucceeded { .. }) => Step::Complete,
        (Step::Analyzing, WorkflowEvent::AnalysisFailed { .. }) => Step::SelectingFiles,

        (Step::Complete, WorkflowEvent::Reset) => Step::Idle,

        _ => {
            return Err(IllegalTransition {
                step,
                event: event.name(),
            });
        }
    };
    Ok(next)
}
