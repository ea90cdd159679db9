//! Pure reducer for the analysis workflow
//!
//! All session transitions happen here:
//! - Takes current state + event
//! - Returns the side effects for the driver to execute
//! - No I/O, no async
//!
//! Completions whose ticket no longer matches the in-flight request are
//! dropped before legality is checked, so a late response after a reset is
//! ignored instead of being reported as an illegal transition.

use super::events::{SideEffect, WorkflowEvent};
use super::machine::{Step, transition};
use super::state::{Notification, SessionState};
use crate::error::{ValidationError, WorkflowError};
use crate::{log_debug, log_error, log_info, log_warn};

/// Reducer: (state, event) → effects
///
/// On `Err`, the state is unchanged apart from `last_error` and the
/// notification queue (validation failures only).
///
/// Any completion with no matching in-flight ticket is treated as stale,
/// never illegal: it yields `Ok` with no effects, whatever the current step.
pub fn reduce(
    state: &mut SessionState,
    event: WorkflowEvent,
) -> Result<Vec<SideEffect>, WorkflowError> {
    if let Some(ticket) = event.ticket()
        && !state.is_current(ticket)
    {
        log_debug!(
            "Dropping stale {} for {:?} (current generation {}, in flight {:?})",
            event.name(),
            ticket,
            state.generation,
            state.in_flight
        );
        return Ok(Vec::new());
    }

    let next = transition(state.step, &event).inspect_err(|err| {
        log_error!("{} [{}]", err, state.summary());
    })?;

    let mut effects = Vec::new();

    match event {
        // ─────────────────────────────────────────────────────────────────────────
        // Step 1: repository coordinates
        // ─────────────────────────────────────────────────────────────────────────
        WorkflowEvent::Submit { repo, branch } => {
            let repo = repo.trim();
            let branch = branch.trim();
            if repo.is_empty() {
                return Err(reject(state, ValidationError::EmptyRepository));
            }
            if branch.is_empty() {
                return Err(reject(state, ValidationError::EmptyBranch));
            }

            state.repo = repo.to_string();
            state.branch = branch.to_string();
            state.last_error = None;
            state.progress = 0;
            state.step = next;
            state.notify(Notification::info("Fetching repository files..."));

            let ticket = state.issue_ticket();
            log_info!("Fetching file tree for {}@{}", state.repo, state.branch);
            effects.push(SideEffect::FetchFileTree {
                ticket,
                repo: state.repo.clone(),
                branch: state.branch.clone(),
            });
        }

        WorkflowEvent::FilesFetched { tree, .. } => {
            state.in_flight = None;
            let file_count = tree.file_count();
            state.selection.replace(tree);
            state.progress = 100;
            state.step = next;
            log_info!("File tree loaded: {} files", file_count);
            if file_count == 0 {
                state.notify(Notification::warning("The repository has no files to analyze"));
            } else {
                state.notify(Notification::success(format!("Found {file_count} files")));
            }
        }

        WorkflowEvent::FetchFailed { error, .. } => {
            state.in_flight = None;
            state.progress = 0;
            state.step = next;
            log_warn!("Fetching file tree failed: {}", error);
            state.record_error(error.to_string());
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Step 2: file selection
        // ─────────────────────────────────────────────────────────────────────────
        WorkflowEvent::ToggleFile { path, included } => {
            if !state.selection.toggle(&path, included) {
                log_debug!("Ignoring toggle for unknown file: {}", path);
            }
        }

        WorkflowEvent::SelectAll => state.selection.select_all(),

        WorkflowEvent::DeselectAll => state.selection.deselect_all(),

        WorkflowEvent::Analyze => {
            let selected_files = match state.selection.validate_for_submission() {
                Ok(paths) => paths,
                Err(err) => return Err(reject(state, err)),
            };

            state.last_error = None;
            state.progress = 0;
            state.step = next;
            state.notify(Notification::info("Analyzing selected files..."));

            let ticket = state.issue_ticket();
            log_info!("Submitting {} files for analysis", selected_files.len());
            effects.push(SideEffect::GenerateDocument {
                ticket,
                repo: state.repo.clone(),
                branch: state.branch.clone(),
                selected_files,
            });
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Step 3: results
        // ─────────────────────────────────────────────────────────────────────────
        WorkflowEvent::AnalysisSucceeded { result, .. } => {
            state.in_flight = None;
            log_info!("Analysis complete: {} documents", result.document_count());
            state.result = Some(result);
            state.progress = 100;
            state.step = next;
            state.notify(Notification::success("Analysis complete"));
        }

        WorkflowEvent::AnalysisFailed { error, .. } => {
            state.in_flight = None;
            state.progress = 0;
            state.step = next;
            log_warn!("Analysis failed: {}", error);
            state.record_error(error.to_string());
        }

        WorkflowEvent::Reset => {
            state.start_over();
            state.step = next;
            debug_assert_eq!(state.step, Step::Idle);
            log_debug!("Session reset, generation {}", state.generation);
        }
    }

    Ok(effects)
}

/// Surface a failed guard without leaving the current step
fn reject(state: &mut SessionState, err: ValidationError) -> WorkflowError {
    log_debug!("Rejected in step {}: {}", state.step, err);
    state.record_error(err.to_string());
    err.into()
}
