//! Repository-analysis backend contract
//!
//! Request and response schemas for the two backend calls plus the
//! `AnalysisBackend` trait the orchestrator talks to. The HTTP client and
//! the retry wrapper are the two production implementations.

mod http;
mod retry;

pub use http::{GENERATE_DOCUMENT_PATH, HttpBackend, LIST_FILES_PATH, normalize_base_url};
pub use retry::{RetryPolicy, RetryingBackend};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::error::TransportError;
use crate::log_debug;
use crate::workflow::FileEntry;

// ═══════════════════════════════════════════════════════════════════════════════
// Wire Schemas
// ═══════════════════════════════════════════════════════════════════════════════

/// Body of the list-files call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilesRequest {
    pub repo_name: String,
    pub branch_name: String,
}

/// Success body of the list-files call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileEntry>,
}

/// Body of the generate-document call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateDocumentRequest {
    pub repo_name: String,
    pub branch_name: String,
    pub selected_files: Vec<String>,
}

/// Success body of the generate-document call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateDocumentResponse {
    pub final_documents: serde_json::Value,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Backend Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// One request per call, no implicit retry
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn list_files(
        &self,
        request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError>;

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError>;
}

#[async_trait]
impl<B: AnalysisBackend + ?Sized> AnalysisBackend for Arc<B> {
    async fn list_files(
        &self,
        request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError> {
        (**self).list_files(request).await
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError> {
        (**self).generate_document(request).await
    }
}

/// Build the configured backend: HTTP, wrapped in a retry policy when enabled
pub fn build_backend(config: &Config) -> Result<Arc<dyn AnalysisBackend>> {
    let http = HttpBackend::from_config(config)?;
    let policy = RetryPolicy::from_config(&config.retry);

    if policy.is_enabled() {
        log_debug!("Backend retries enabled: {:?}", policy);
        Ok(Arc::new(RetryingBackend::new(http, policy)))
    } else {
        Ok(Arc::new(http))
    }
}
