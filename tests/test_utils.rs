// Not every test binary uses every helper
#![allow(dead_code)]

use async_trait::async_trait;
use lingurepo::FileEntry;
use lingurepo::backend::{
    AnalysisBackend, GenerateDocumentRequest, GenerateDocumentResponse, ListFilesRequest,
    ListFilesResponse,
};
use lingurepo::error::TransportError;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Mock data builders shared by the integration tests
pub struct MockDataBuilder;

impl MockDataBuilder {
    /// `a.ts` at the root plus `src/b.ts`
    pub fn demo_files() -> Vec<FileEntry> {
        vec![
            FileEntry::file("a.ts", "a.ts"),
            FileEntry::dir("src", "src", vec![FileEntry::file("b.ts", "src/b.ts")]),
        ]
    }

    /// A wider tree with nested directories
    pub fn nested_files() -> Vec<FileEntry> {
        vec![
            FileEntry::file("README.md", "README.md"),
            FileEntry::dir(
                "src",
                "src",
                vec![
                    FileEntry::file("main.rs", "src/main.rs"),
                    FileEntry::dir(
                        "workflow",
                        "src/workflow",
                        vec![
                            FileEntry::file("mod.rs", "src/workflow/mod.rs"),
                            FileEntry::file("reducer.rs", "src/workflow/reducer.rs"),
                        ],
                    ),
                ],
            ),
            FileEntry::dir("docs", "docs", Vec::new()),
        ]
    }

    pub fn demo_document() -> Value {
        json!({
            "a.ts": { "summary": "Entry point", "exports": ["main"] }
        })
    }
}

/// Counting backend double
///
/// Records every request. When `hold` is set, each call waits for
/// [`MockBackend::release`] before answering.
pub struct MockBackend {
    files: Mutex<Result<Vec<FileEntry>, TransportError>>,
    document: Mutex<Result<Value, TransportError>>,
    list_count: AtomicUsize,
    generate_count: AtomicUsize,
    last_generate: Mutex<Option<GenerateDocumentRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Ok(MockDataBuilder::demo_files())),
            document: Mutex::new(Ok(MockDataBuilder::demo_document())),
            list_count: AtomicUsize::new(0),
            generate_count: AtomicUsize::new(0),
            last_generate: Mutex::new(None),
            gate: None,
        }
    }

    pub fn held() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::new()
        }
    }

    pub fn set_files(&self, files: Result<Vec<FileEntry>, TransportError>) {
        *self.files.lock() = files;
    }

    pub fn set_document(&self, document: Result<Value, TransportError>) {
        *self.document.lock() = document;
    }

    /// Let one held call answer
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn generate_count(&self) -> usize {
        self.generate_count.load(Ordering::SeqCst)
    }

    pub fn last_generate(&self) -> Option<GenerateDocumentRequest> {
        self.last_generate.lock().clone()
    }

    async fn wait_for_release(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn list_files(
        &self,
        _request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        self.wait_for_release().await;
        self.files
            .lock()
            .clone()
            .map(|files| ListFilesResponse { files })
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError> {
        self.generate_count.fetch_add(1, Ordering::SeqCst);
        *self.last_generate.lock() = Some(request.clone());
        self.wait_for_release().await;
        self.document
            .lock()
            .clone()
            .map(|final_documents| GenerateDocumentResponse { final_documents })
    }
}
