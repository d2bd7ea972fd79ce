//! Plain-text views of the onboarding state.

use crate::chat::{DemoChat, Role};
use crate::describe::DescriptionField;
use crate::pages::{PageScan, PageStatus};
use crate::results::ScanSnapshot;
use std::fmt::Write;

pub const NO_CHUNKS_YET: &str = "No data chunks available yet.";

fn status_label(status: PageStatus) -> &'static str {
    match status {
        PageStatus::Pending => "Pending",
        PageStatus::Scraping => "Scraping...",
        PageStatus::Completed => "Completed",
        PageStatus::Failed => "Failed",
    }
}

fn render_page(out: &mut String, index: usize, page: &PageScan) {
    let _ = writeln!(out, "{}. {} [{}]", index + 1, page.url(), status_label(page.status()));
    match page.status() {
        PageStatus::Completed => {
            for chunk in page.chunks() {
                let _ = writeln!(out, "     - {chunk}");
            }
        }
        PageStatus::Failed => {
            let _ = writeln!(out, "     ! {}", page.error().unwrap_or("scan failed"));
        }
        PageStatus::Pending | PageStatus::Scraping => {
            let _ = writeln!(out, "     {NO_CHUNKS_YET}");
        }
    }
}

/// Render the scan status panel. Empty before the first submission.
pub fn render_snapshot(snapshot: &ScanSnapshot) -> String {
    let mut out = String::new();
    if snapshot.records.is_empty() {
        return out;
    }

    let header = if snapshot.in_progress {
        "Website Analysis Status (analyzing...)"
    } else {
        "Website Analysis Status"
    };
    let _ = writeln!(out, "{header}");
    for (index, page) in snapshot.records.iter().enumerate() {
        render_page(&mut out, index, page);
    }
    if snapshot.can_continue() {
        let _ = writeln!(out, "-> Continue to Integration");
    }
    out
}

pub fn render_description(field: &DescriptionField) -> String {
    let mut out = String::new();
    if field.loading {
        let _ = writeln!(out, "Fetching website description...");
    }
    if let Some(error) = &field.error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(description) = &field.description {
        let _ = writeln!(out, "{description}");
    }
    if field.is_auto_fetched() {
        let _ = writeln!(out, "Auto-fetched from your website. Feel free to edit.");
    }
    out
}

pub fn render_chat(chat: &DemoChat) -> String {
    let mut out = String::new();
    for message in chat.messages() {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "bot",
        };
        let _ = writeln!(out, "{speaker}> {}", message.content);
    }
    out
}
