//! Output formatting for the CLI.

use campus_commerce::notify::{Notification, NotificationLevel, NotificationSink};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Debug, Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        println!("  {}", format_row(cols, widths));
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Cart and checkout notifications print as toasts.
impl NotificationSink for Output {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => self.success(&notification.message),
            NotificationLevel::Info => self.info(&notification.message),
            NotificationLevel::Error => self.error(&notification.message),
        }
    }
}

/// Pad each column to its width; the last column is left unpadded.
pub fn format_row(cols: &[&str], widths: &[usize]) -> String {
    let last = cols.len().saturating_sub(1);
    cols.iter()
        .enumerate()
        .map(|(i, col)| match widths.get(i) {
            Some(width) if i < last => format!("{}{}", truncate(col, *width), pad(col, *width)),
            _ => col.to_string(),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn pad(col: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(col.chars().count()))
}

/// Cut `text` to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Status badge for booking states.
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "confirmed" | "completed" | "approved" => style(status).green().to_string(),
        "pending" => style(status).yellow().to_string(),
        "cancelled" | "canceled" | "rejected" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}
