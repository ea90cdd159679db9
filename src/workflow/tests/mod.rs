//! Workflow tests shared fixtures


use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::backend::{
    AnalysisBackend, GenerateDocumentRequest, GenerateDocumentResponse, ListFilesRequest,
    ListFilesResponse,
};
use crate::error::TransportError;
use crate::workflow::{FileEntry, FileTree};

/// The two-file repository used throughout the workflow tests
pub(super) fn demo_entries() -> Vec<FileEntry> {
    vec![
        FileEntry::file("a.ts", "a.ts"),
        FileEntry::dir("src", "src", vec![FileEntry::file("b.ts", "src/b.ts")]),
    ]
}

pub(super) fn demo_tree() -> FileTree {
    FileTree::from_entries(demo_entries()).expect("demo tree is valid")
}

pub(super) fn demo_document() -> Value {
    json!({ "a.ts": { "summary": "Entry point" } })
}

/// Backend double that records every request it receives
pub(super) struct MockBackend {
    files: Result<Vec<FileEntry>, TransportError>,
    document: Result<Value, TransportError>,
    list_calls: Mutex<Vec<ListFilesRequest>>,
    generate_calls: Mutex<Vec<GenerateDocumentRequest>>,
}

impl MockBackend {
    pub(super) fn demo() -> Self {
        Self {
            files: Ok(demo_entries()),
            document: Ok(demo_document()),
            list_calls: Mutex::new(Vec::new()),
            generate_calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn with_files(mut self, files: Result<Vec<FileEntry>, TransportError>) -> Self {
        self.files = files;
        self
    }

    pub(super) fn with_document(mut self, document: Result<Value, TransportError>) -> Self {
        self.document = document;
        self
    }

    pub(super) fn list_calls(&self) -> Vec<ListFilesRequest> {
        self.list_calls.lock().clone()
    }

    pub(super) fn generate_calls(&self) -> Vec<GenerateDocumentRequest> {
        self.generate_calls.lock().clone()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn list_files(
        &self,
        request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError> {
        self.list_calls.lock().push(request.clone());
        self.files
            .clone()
            .map(|files| ListFilesResponse { files })
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError> {
        self.generate_calls.lock().push(request.clone());
        self.document
            .clone()
            .map(|final_documents| GenerateDocumentResponse { final_documents })
    }
}
