//! Events and side effects for the analysis workflow
//!
//! User actions and request completions are both `WorkflowEvent`s; the
//! reducer turns them into state changes plus `SideEffect`s for the driver.

use super::file_tree::FileTree;
use crate::error::TransportError;
use crate::types::AnalysisResult;

// ═══════════════════════════════════════════════════════════════════════════════
// Request Tickets
// ═══════════════════════════════════════════════════════════════════════════════

/// Tag carried by every outbound request and its completion
///
/// `generation` changes on every reset; `request_id` is unique per request.
/// A completion is applied only when its ticket matches the session's
/// in-flight ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub generation: u64,
    pub request_id: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Workflow Events
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything that can happen to a session
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────
    /// Repository coordinates entered
    Submit { repo: String, branch: String },
    /// Include or exclude a single file
    ToggleFile { path: String, included: bool },
    SelectAll,
    DeselectAll,
    /// Submit the current selection for analysis
    Analyze,
    /// Start over
    Reset,

    // ─────────────────────────────────────────────────────────────────────────
    // Request completions
    // ─────────────────────────────────────────────────────────────────────────
    FilesFetched {
        ticket: RequestTicket,
        tree: FileTree,
    },
    FetchFailed {
        ticket: RequestTicket,
        error: TransportError,
    },
    AnalysisSucceeded {
        ticket: RequestTicket,
        result: AnalysisResult,
    },
    AnalysisFailed {
        ticket: RequestTicket,
        error: TransportError,
    },
}

impl WorkflowEvent {
    /// Stable name used in logs and illegal-transition errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::ToggleFile { .. } => "toggle_file",
            Self::SelectAll => "select_all",
            Self::DeselectAll => "deselect_all",
            Self::Analyze => "analyze",
            Self::Reset => "reset",
            Self::FilesFetched { .. } => "files_fetched",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::AnalysisSucceeded { .. } => "analysis_succeeded",
            Self::AnalysisFailed { .. } => "analysis_failed",
        }
    }

    /// Ticket of a request completion, `None` for user actions
    pub fn ticket(&self) -> Option<RequestTicket> {
        match self {
            Self::FilesFetched { ticket, .. }
            | Self::FetchFailed { ticket, .. }
            | Self::AnalysisSucceeded { ticket, .. }
            | Self::AnalysisFailed { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Side Effects
// ═══════════════════════════════════════════════════════════════════════════════

/// Network work requested by the reducer, executed by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    FetchFileTree {
        ticket: RequestTicket,
        repo: String,
        branch: String,
    },
    GenerateDocument {
        ticket: RequestTicket,
        repo: String,
        branch: String,
        selected_files: Vec<String>,
    },
}

impl SideEffect {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Self::FetchFileTree { ticket, .. } | Self::GenerateDocument { ticket, .. } => *ticket,
        }
    }
}
