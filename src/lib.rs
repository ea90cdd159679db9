//! `LinguRepo` - guided repository analysis client
//!
//! This library drives an external repository-analysis service through a
//! multi-step workflow: fetch a repository's file tree, select files, submit
//! them for analysis, and export the generated design document.

// Allow certain clippy warnings that are stylistic
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod types;
pub mod ui;
pub mod workflow;

// Re-export important structs and functions for easier testing
pub use backend::{AnalysisBackend, HttpBackend, RetryPolicy, RetryingBackend};
pub use config::Config;
pub use error::{IllegalTransition, TransportError, ValidationError, WorkflowError};
pub use types::AnalysisResult;
pub use workflow::{FileEntry, FileSelection, FileTree, SessionState, Step, WorkflowApp};
