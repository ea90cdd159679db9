//! Request orchestration
//!
//! Turns side effects into backend calls and backend outcomes into
//! completion events. Completions travel over an unbounded channel tagged
//! with the ticket of the request that produced them.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::events::{RequestTicket, SideEffect, WorkflowEvent};
use super::file_tree::FileTree;
use crate::backend::{AnalysisBackend, GenerateDocumentRequest, ListFilesRequest};
use crate::error::TransportError;
use crate::types::AnalysisResult;
use crate::{log_debug, trace_info};

/// Issues backend requests on behalf of one session
#[derive(Clone)]
pub struct RequestOrchestrator {
    backend: Arc<dyn AnalysisBackend>,
    completion_tx: mpsc::UnboundedSender<WorkflowEvent>,
}

impl RequestOrchestrator {
    /// Create an orchestrator and the receiver its completions arrive on
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                completion_tx,
            },
            completion_rx,
        )
    }

    /// List the files of `repo` at `branch` as a validated tree
    ///
    /// A response that violates the tree invariants (duplicate paths, files
    /// with children) is a malformed payload.
    pub async fn fetch_file_tree(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<FileTree, TransportError> {
        let request = ListFilesRequest {
            repo_name: repo.to_string(),
            branch_name: branch.to_string(),
        };
        let response = self.backend.list_files(&request).await?;
        FileTree::from_entries(response.files).map_err(|e| TransportError::malformed(e.to_string()))
    }

    /// Generate the design document for `selected_files`
    pub async fn generate_document(
        &self,
        repo: &str,
        branch: &str,
        selected_files: &[String],
    ) -> Result<AnalysisResult, TransportError> {
        let request = GenerateDocumentRequest {
            repo_name: repo.to_string(),
            branch_name: branch.to_string(),
            selected_files: selected_files.to_vec(),
        };
        let response = self.backend.generate_document(&request).await?;
        AnalysisResult::from_final_documents(response.final_documents)
    }

    /// Run `effect` on the tokio runtime and report its completion
    pub fn execute(&self, effect: SideEffect) -> JoinHandle<()> {
        let orchestrator = self.clone();
        let ticket = effect.ticket();
        let span = tracing::info_span!(
            "request",
            generation = ticket.generation,
            request_id = ticket.request_id
        );

        tokio::spawn(
            async move {
                let event = orchestrator.run(effect).await;
                trace_info!(outcome = event.name(), "request finished");
                orchestrator.complete(ticket, event);
            }
            .instrument(span),
        )
    }

    async fn run(&self, effect: SideEffect) -> WorkflowEvent {
        match effect {
            SideEffect::FetchFileTree {
                ticket,
                repo,
                branch,
            } => match self.fetch_file_tree(&repo, &branch).await {
                Ok(tree) => WorkflowEvent::FilesFetched { ticket, tree },
                Err(error) => WorkflowEvent::FetchFailed { ticket, error },
            },
            SideEffect::GenerateDocument {
                ticket,
                repo,
                branch,
                selected_files,
            } => match self
                .generate_document(&repo, &branch, &selected_files)
                .await
            {
                Ok(result) => WorkflowEvent::AnalysisSucceeded { ticket, result },
                Err(error) => WorkflowEvent::AnalysisFailed { ticket, error },
            },
        }
    }

    fn complete(&self, ticket: RequestTicket, event: WorkflowEvent) {
        if self.completion_tx.send(event).is_err() {
            log_debug!("Session gone, dropping completion for {:?}", ticket);
        }
    }
}
