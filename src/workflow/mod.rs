//! Workflow orchestration engine
//!
//! A guided session moves through five steps:
//! - `Idle`: waiting for repository coordinates
//! - `FetchingFiles`: list-files request in flight
//! - `SelectingFiles`: the user picks files from the tree
//! - `Analyzing`: generate-document request in flight
//! - `Complete`: the document is ready to review and export
//!
//! User actions and request completions are `WorkflowEvent`s. The pure
//! reducer applies them to a `SessionState`; `WorkflowApp` executes the
//! resulting side effects through the `RequestOrchestrator`.

mod app;
mod events;
mod file_tree;
mod machine;
mod orchestrator;
mod reducer;
mod selection;
mod state;

#[cfg(test)]
mod tests;

// Re-exports
pub use app::WorkflowApp;
pub use events::{RequestTicket, SideEffect, WorkflowEvent};
pub use file_tree::{EntryKind, FileEntry, FilePaths, FileTree, FlatEntry, TreeError};
pub use machine::{Step, transition};
pub use orchestrator::RequestOrchestrator;
pub use reducer::reduce;
pub use selection::FileSelection;
pub use state::{Notification, NotificationLevel, SessionState};
