//! Result types produced by the analysis workflow

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::TransportError;

/// The generated design document for one analysis run
///
/// Replaced wholesale on each successful analysis, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The `final_documents` value exactly as the backend returned it
    pub raw_document: Value,
    /// Per-file documents keyed by repository path
    pub per_file_documents: BTreeMap<String, Value>,
}

impl AnalysisResult {
    /// Build a result from the backend's `final_documents` value
    ///
    /// Anything other than a JSON object is a malformed payload.
    pub fn from_final_documents(final_documents: Value) -> Result<Self, TransportError> {
        let Value::Object(map) = &final_documents else {
            return Err(TransportError::malformed(format!(
                "`final_documents` must be an object, got {}",
                json_kind(&final_documents)
            )));
        };

        let per_file_documents = map
            .iter()
            .map(|(path, doc)| (path.clone(), doc.clone()))
            .collect();

        Ok(Self {
            raw_document: final_documents,
            per_file_documents,
        })
    }

    /// Number of per-file documents
    pub fn document_count(&self) -> usize {
        self.per_file_documents.len()
    }

    /// Document generated for `path`, if any
    pub fn document_for(&self, path: &str) -> Option<&Value> {
        self.per_file_documents.get(path)
    }

    /// Pretty JSON of the raw document, as offered for download
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.raw_document)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
