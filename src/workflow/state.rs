//! Session state for the analysis workflow
//!
//! One `SessionState` exists per analysis session. Its fields are only
//! mutated by the reducer; callers read them through accessors.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use super::events::RequestTicket;
use super::machine::Step;
use super::selection::FileSelection;
use crate::types::AnalysisResult;

/// Maximum queued notifications; older ones are dropped first
const MAX_NOTIFICATIONS: usize = 5;

// ═══════════════════════════════════════════════════════════════════════════════
// Notifications
// ═══════════════════════════════════════════════════════════════════════════════

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session State
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete state of one analysis session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(super) step: Step,
    pub(super) repo: String,
    pub(super) branch: String,
    pub(super) selection: FileSelection,
    pub(super) result: Option<AnalysisResult>,
    pub(super) last_error: Option<String>,
    /// Percentage of the current request, 0..=100
    pub(super) progress: u8,
    pub(super) notifications: VecDeque<Notification>,
    /// Bumped on every reset
    pub(super) generation: u64,
    pub(super) next_request_id: u64,
    pub(super) in_flight: Option<RequestTicket>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_busy(&self) -> bool {
        self.step.is_busy()
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }

    /// Queued notifications, oldest first
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Dismiss the oldest notification
    pub fn dismiss_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    /// Drain every queued notification
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// One-line description used in logs
    pub fn summary(&self) -> String {
        format!(
            "step={} repo={:?} branch={:?} files={} selected={} generation={} in_flight={:?}",
            self.step,
            self.repo,
            self.branch,
            self.selection.tree().file_count(),
            self.selection.selected_count(),
            self.generation,
            self.in_flight,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation helpers (reducer only)
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    /// Record a recoverable error and surface it to the user
    pub(super) fn record_error(&mut self, message: String) {
        self.notify(Notification::error(message.clone()));
        self.last_error = Some(message);
    }

    /// Allocate the ticket for a new outbound request
    pub(super) fn issue_ticket(&mut self) -> RequestTicket {
        self.next_request_id += 1;
        let ticket = RequestTicket {
            generation: self.generation,
            request_id: self.next_request_id,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Whether a completion carrying `ticket` belongs to the current request
    pub(super) fn is_current(&self, ticket: RequestTicket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Start over: new generation, nothing selected, nothing in flight
    pub(super) fn start_over(&mut self) {
        self.generation += 1;
        self.repo.clear();
        self.branch.clear();
        self.selection.clear();
        self.result = None;
        self.last_error = None;
        self.progress = 0;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_are_bounded() {
        let mut state = SessionState::new();
        for i in 0..8 {
            state.notify(Notification::info(format!("message {i}")));
        }
        let messages: Vec<_> = state.notifications().map(|n| n.message.clone()).collect();
        assert_eq!(messages.len(), MAX_NOTIFICATIONS);
        assert_eq!(messages.first().map(String::as_str), Some("message 3"));
    }

    #[test]
    fn dismiss_removes_oldest() {
        let mut state = SessionState::new();
        state.notify(Notification::info("first"));
        state.notify(Notification::warning("second"));

        let dismissed = state.dismiss_notification().expect("one queued");
        assert_eq!(dismissed.message, "first");
        assert_eq!(state.take_notifications().len(), 1);
        assert!(state.dismiss_notification().is_none());
    }

    #[test]
    fn tickets_are_unique_and_tracked() {
        let mut state = SessionState::new();
        let first = state.issue_ticket();
        let second = state.issue_ticket();
        assert_ne!(first, second);
        assert!(state.is_current(second));
        assert!(!state.is_current(first));
    }

    #[test]
    fn start_over_bumps_generation() {
        let mut state = SessionState::new();
        state.repo = "octo/demo".to_string();
        let ticket = state.issue_ticket();

        state.start_over();

        assert_eq!(state.generation(), 1);
        assert!(state.repo().is_empty());
        assert!(!state.is_current(ticket));
        assert!(state.in_flight().is_none());
    }
}
