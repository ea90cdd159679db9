use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::fmt::Write;
use std::sync::LazyLock;
use std::time::Duration;

use crate::workflow::{EntryKind, FileSelection, Notification, NotificationLevel, Step};

// RGB tuple constants for use with the `colored` crate's `.truecolor()` method
pub mod rgb {
    pub const ELECTRIC_PURPLE: (u8, u8, u8) = (225, 53, 255);
    pub const NEON_CYAN: (u8, u8, u8) = (128, 255, 234);
    pub const DIM_WHITE: (u8, u8, u8) = (180, 180, 190);
    pub const DIM_SEPARATOR: (u8, u8, u8) = (60, 60, 70);
}

/// Track quiet mode state
static QUIET_MODE: LazyLock<Mutex<bool>> = LazyLock::new(|| Mutex::new(false));

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    *QUIET_MODE.lock() = enabled;
}

/// Check if quiet mode is enabled
pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    // Don't create a spinner in quiet mode
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("✦✧✶✷✸✹✺✻✼✽")
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_info(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.cyan().bold());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.yellow().bold());
    }
}

pub fn print_error(message: &str) {
    // Always print errors, even in quiet mode
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.green().bold());
    }
}

/// Print content with decorative borders
pub fn print_bordered_content(content: &str) {
    if !is_quiet_mode() {
        println!("{}", "━".repeat(50).bright_purple());
        println!("{content}");
        println!("{}", "━".repeat(50).bright_purple());
    }
}

/// Print a simple message (respects quiet mode)
pub fn print_message(message: &str) {
    if !is_quiet_mode() {
        println!("{message}");
    }
}

/// Print the heading of a workflow step
pub fn print_step(step: Step) {
    if !is_quiet_mode() {
        println!();
        println!("{}", create_gradient_text(step.title()).bold());
        let (r, g, b) = rgb::DIM_SEPARATOR;
        println!("{}", "─".repeat(step.title().chars().count()).truecolor(r, g, b));
    }
}

/// Print queued notifications by level
pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let message = notification.message.as_str();
        match notification.level {
            NotificationLevel::Info => print_info(message),
            NotificationLevel::Success => print_success(message),
            NotificationLevel::Warning => print_warning(message),
            NotificationLevel::Error => print_error(message),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File Tree Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Plain-text tree with a checkbox in front of every file
///
/// ```text
/// [x] a.ts
/// src/
///   [ ] b.ts
/// ```
pub fn render_file_tree(selection: &FileSelection) -> String {
    let mut out = String::new();
    for entry in selection.tree().flatten() {
        let indent = "  ".repeat(entry.depth);
        let line = match entry.kind {
            EntryKind::Directory => format!("{indent}{}/", entry.name),
            EntryKind::File => {
                let mark = if selection.is_selected(&entry.path) {
                    'x'
                } else {
                    ' '
                };
                format!("{indent}[{mark}] {}", entry.name)
            }
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

/// Print the tree, highlighting selected files
pub fn print_file_tree(selection: &FileSelection) {
    if is_quiet_mode() {
        return;
    }
    for line in render_file_tree(selection).lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("[x]") {
            println!("{}", line.green());
        } else if trimmed.ends_with('/') {
            let (r, g, b) = rgb::NEON_CYAN;
            println!("{}", line.truecolor(r, g, b).bold());
        } else {
            let (r, g, b) = rgb::DIM_WHITE;
            println!("{}", line.truecolor(r, g, b));
        }
    }
}

/// Create gradient text with Electric Purple -> Neon Cyan
pub fn create_gradient_text(text: &str) -> String {
    let gradient = [
        rgb::ELECTRIC_PURPLE,
        (200, 100, 255),
        (180, 150, 250),
        (150, 200, 245),
        rgb::NEON_CYAN,
    ];

    apply_gradient(text, &gradient)
}

fn apply_gradient(text: &str, gradient: &[(u8, u8, u8)]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let chars_len = chars.len();
    let gradient_len = gradient.len();

    let mut result = String::new();

    if chars_len == 0 || gradient_len == 0 {
        return result;
    }

    for (i, c) in chars.iter().enumerate() {
        let index = if chars_len == 1 {
            0
        } else {
            i * (gradient_len - 1) / (chars_len - 1)
        };
        let (r, g, b) = gradient.get(index).copied().unwrap_or(rgb::NEON_CYAN);
        let _ = write!(result, "{}", c.to_string().truecolor(r, g, b));
    }

    result
}
