//! Session driver
//!
//! Owns one `SessionState`, feeds events through the reducer, and hands the
//! resulting side effects to the orchestrator. Completions come back over
//! the orchestrator's channel and re-enter the reducer one at a time.

use std::sync::Arc;
use tokio::sync::mpsc;

use super::events::WorkflowEvent;
use super::machine::Step;
use super::orchestrator::RequestOrchestrator;
use super::reducer::reduce;
use super::state::{Notification, SessionState};
use crate::backend::AnalysisBackend;
use crate::error::WorkflowError;
use crate::{log_debug, log_error};

/// One analysis session wired to a backend
pub struct WorkflowApp {
    state: SessionState,
    orchestrator: RequestOrchestrator,
    completion_rx: mpsc::UnboundedReceiver<WorkflowEvent>,
}

impl WorkflowApp {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (orchestrator, completion_rx) = RequestOrchestrator::new(backend);
        Self {
            state: SessionState::new(),
            orchestrator,
            completion_rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run `event` to completion and start any requests it produced
    pub fn dispatch(&mut self, event: WorkflowEvent) -> Result<(), WorkflowError> {
        let name = event.name();
        let effects = reduce(&mut self.state, event).inspect_err(|err| {
            if cfg!(debug_assertions) && matches!(err, WorkflowError::IllegalTransition(_)) {
                log_error!(
                    "Illegal `{}` dispatched; session snapshot: {} progress={} last_error={:?} result={}",
                    name,
                    self.state.summary(),
                    self.state.progress(),
                    self.state.last_error(),
                    self.state.result().is_some(),
                );
            }
        })?;

        for effect in effects {
            log_debug!("Executing {:?}", effect);
            // Completion arrives on the channel; the handle is not needed.
            drop(self.orchestrator.execute(effect));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn submit(
        &mut self,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::Submit {
            repo: repo.into(),
            branch: branch.into(),
        })
    }

    pub fn toggle_file(
        &mut self,
        path: impl Into<String>,
        included: bool,
    ) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::ToggleFile {
            path: path.into(),
            included,
        })
    }

    pub fn select_all(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::SelectAll)
    }

    pub fn deselect_all(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::DeselectAll)
    }

    pub fn analyze(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::Analyze)
    }

    pub fn reset(&mut self) -> Result<(), WorkflowError> {
        self.dispatch(WorkflowEvent::Reset)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completions
    // ─────────────────────────────────────────────────────────────────────────

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` only if the completion channel is closed.
    pub async fn next_completion(&mut self) -> Option<Result<(), WorkflowError>> {
        let event = self.completion_rx.recv().await?;
        Some(self.dispatch(event))
    }

    /// Apply completions until no request is in flight
    pub async fn wait_until_settled(&mut self) -> Result<Step, WorkflowError> {
        while self.state.is_busy() {
            match self.next_completion().await {
                Some(result) => result?,
                None => break,
            }
        }
        Ok(self.state.step())
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.completion_rx.try_recv() {
            if let Err(err) = self.dispatch(event) {
                log_error!("Completion rejected: {}", err);
            }
            applied += 1;
        }
        applied
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.state.take_notifications()
    }
}
