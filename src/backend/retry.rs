//! Opt-in retry policy layered over any backend

use async_trait::async_trait;
use std::iter::Take;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use super::{
    AnalysisBackend, GenerateDocumentRequest, GenerateDocumentResponse, ListFilesRequest,
    ListFilesResponse,
};
use crate::config::RetryConfig;
use crate::error::TransportError;
use crate::log_warn;

/// Upper bound for a single backoff delay
const MAX_DELAY: Duration = Duration::from_secs(10);

/// How many extra attempts to make, and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying
    pub attempts: usize,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts,
            base_delay_ms: config.base_delay_ms,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.attempts > 0
    }

    /// Delays of `2 * base`, `4 * base`, ... capped at ten seconds
    pub fn strategy(&self) -> Take<ExponentialBackoff> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms)
            .max_delay(MAX_DELAY)
            .take(self.attempts)
    }
}

/// Wraps a backend and retries transient transport failures
pub struct RetryingBackend<B> {
    inner: B,
    policy: RetryPolicy,
}

impl<B: AnalysisBackend> RetryingBackend<B> {
    pub fn new(inner: B, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn should_retry(operation: &'static str) -> impl FnMut(&TransportError) -> bool {
    move |err| {
        let retry = err.is_retryable();
        if retry {
            log_warn!("{} failed, retrying: {}", operation, err);
        }
        retry
    }
}

#[async_trait]
impl<B: AnalysisBackend> AnalysisBackend for RetryingBackend<B> {
    async fn list_files(
        &self,
        request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError> {
        RetryIf::spawn(
            self.policy.strategy(),
            || self.inner.list_files(request),
            should_retry("list-files"),
        )
        .await
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError> {
        RetryIf::spawn(
            self.policy.strategy(),
            || self.inner.generate_document(request),
            should_retry("generate-design-document"),
        )
        .await
    }
}
