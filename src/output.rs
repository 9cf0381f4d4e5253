//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every category and
//! media item leads with its positional index and display text; filesystem
//! paths follow as indented `Source:` context lines.
//!
//! # Output Format
//!
//! ## Scan / Probe
//!
//! ```text
//! Categories
//! 001 Professional PCB Design (2 items)
//!     Key: pcb
//!     001 Control Board
//!         Source: Images&videos/PCB designing/010-Control board.png
//!         Description: Control board for 4 groups coffee machine
//!     002 Board Design (video)
//!         Source: Images&videos/PCB designing/Board design.mp4
//!
//! Missing folders
//!     Images&videos/Old work
//! ```
//!
//! ## Check
//!
//! ```text
//! Manifest: file (portfolio-manifest.json)
//! Checked 15 items in 4 categories
//! Unresolved
//!     pcb: Images&videos/PCB designing/missing.png
//! ```
//!
//! ## Build
//!
//! ```text
//! Manifest: compiled-in fallback
//! 001 Embedded Software Development → 5 slides
//! 002 Professional PCB Design → 6 slides
//! Wrote dist/index.html
//! Copied 11 media files, 4 missing
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::BuildSummary;
use crate::loader::{LoadOutcome, ManifestSource, diagnostic};
use crate::scan::ScanReport;
use crate::types::{Manifest, MediaItem};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 Title (N items)`
fn category_header(index: usize, title: &str, count: usize) -> String {
    let noun = if count == 1 { "item" } else { "items" };
    format!("{} {} ({} {})", format_index(index), title, count, noun)
}

/// Items with alt text show it; the rest fall back to the file name.
fn item_line(index: usize, item: &MediaItem) -> String {
    let label = if item.alt.is_empty() {
        format!("({})", item.src.rsplit('/').next().unwrap_or(&item.src))
    } else {
        item.alt.clone()
    };
    if item.is_video() {
        format!("{} {} (video)", format_index(index), label)
    } else {
        format!("{} {}", format_index(index), label)
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn source_label(source: &ManifestSource, endpoint: &str) -> String {
    match source {
        ManifestSource::Transport(name) => format!("{name} ({endpoint})"),
        ManifestSource::Fallback => "compiled-in fallback".to_string(),
    }
}

// ============================================================================
// Scan / probe
// ============================================================================

/// Category tree with items and their sources.
pub fn format_manifest_tree(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, (key, category)) in manifest.iter().enumerate() {
        lines.push(category_header(i + 1, &category.title, category.images.len()));
        lines.push(format!("{}Key: {}", indent(1), key));
        for (j, item) in category.images.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), item_line(j + 1, item)));
            lines.push(format!("{}Source: {}", indent(2), item.src));
            if !item.description.is_empty() && item.description != item.alt {
                lines.push(format!(
                    "{}Description: {}",
                    indent(2),
                    truncate_desc(&item.description, 80)
                ));
            }
        }
    }
    lines
}

pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = format_manifest_tree(&report.manifest);
    if !report.missing_folders.is_empty() {
        lines.push(String::new());
        lines.push("Missing folders".to_string());
        for folder in &report.missing_folders {
            lines.push(format!("{}{}", indent(1), folder));
        }
    }
    lines
}

pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

pub fn format_probe_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = format_manifest_tree(manifest);
    lines.push(String::new());
    lines.push(format!(
        "Found {} items in {} categories",
        manifest.item_count(),
        manifest.len()
    ));
    lines
}

pub fn print_probe_output(manifest: &Manifest) {
    for line in format_probe_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(
    outcome: &LoadOutcome,
    endpoint: &str,
    unresolved: &[(String, MediaItem)],
) -> Vec<String> {
    let mut lines = vec![format!("Manifest: {}", source_label(&outcome.source, endpoint))];
    if outcome.used_fallback() {
        lines.push(format!("{}{}", indent(1), diagnostic(&outcome.failures)));
    }
    lines.push(format!(
        "Checked {} items in {} categories",
        outcome.manifest.item_count(),
        outcome.manifest.len()
    ));
    if unresolved.is_empty() {
        lines.push("All media resolves".to_string());
    } else {
        lines.push("Unresolved".to_string());
        for (key, item) in unresolved {
            lines.push(format!("{}{}: {}", indent(1), key, item.src));
        }
    }
    lines
}

pub fn print_check_output(outcome: &LoadOutcome, endpoint: &str, unresolved: &[(String, MediaItem)]) {
    for line in format_check_output(outcome, endpoint, unresolved) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Manifest: {}",
        source_label(&summary.source, &summary.endpoint)
    )];
    for (i, (title, slides)) in summary.categories.iter().enumerate() {
        lines.push(format!("{} {} → {} slides", format_index(i + 1), title, slides));
    }
    lines.push(format!("Wrote {}", summary.page.display()));
    lines.push(format!(
        "Copied {} media files, {} missing",
        summary.copied, summary.missing
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}
