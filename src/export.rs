//! Export of a finished analysis
//!
//! Pure serialization of an already computed `AnalysisResult`; nothing here
//! touches the session or the backend.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::log_debug;
use crate::types::AnalysisResult;

/// File name used when no export path is configured
pub const DEFAULT_EXPORT_FILE: &str = "lingurepo-design-document.json";

/// Pretty JSON of the document, with a trailing newline
pub fn render_document(result: &AnalysisResult) -> Result<String> {
    let mut json = result
        .to_pretty_json()
        .context("Failed to serialize design document")?;
    json.push('\n');
    Ok(json)
}

/// Write the document to `path`, creating parent directories as needed
pub fn export_document(result: &AnalysisResult, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = render_document(result)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    log_debug!(
        "Exported {} documents to {}",
        result.document_count(),
        path.display()
    );
    Ok(path.to_path_buf())
}
