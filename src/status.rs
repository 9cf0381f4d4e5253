//! Loading status reporting.
//!
//! The loader and the session report progress as [`Status`] values through a
//! [`StatusSink`]. The in-page sink, [`StatusIndicator`], writes the text and
//! background color into `#status-indicator` when that element exists. Every
//! status is also logged.

use crate::config::StatusPalette;
use crate::dom::{Document, NodeId};
use std::fmt;

pub const STATUS_ELEMENT_ID: &str = "status-indicator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    /// Carries the name of the transport that delivered the manifest.
    ManifestLoaded(String),
    /// Number of categories rendered with at least one item.
    Updated(usize),
    Failed(String),
    UsingFallback,
}

/// Which palette entry a status is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Loading,
    Success,
    Error,
    Fallback,
}

impl Status {
    pub fn tone(&self) -> Tone {
        match self {
            Status::Loading => Tone::Loading,
            Status::ManifestLoaded(_) | Status::Updated(_) => Tone::Success,
            Status::Failed(_) => Tone::Error,
            Status::UsingFallback => Tone::Fallback,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Loading => write!(f, "Loading..."),
            Status::ManifestLoaded(via) => write!(f, "Manifest Loaded ({via})"),
            Status::Updated(n) => write!(f, "Updated {n} Categories"),
            Status::Failed(msg) => write!(f, "Error: {msg}"),
            Status::UsingFallback => write!(f, "Using Fallback"),
        }
    }
}

impl StatusPalette {
    pub fn color(&self, tone: Tone) -> &str {
        match tone {
            Tone::Loading => &self.loading,
            Tone::Success => &self.success,
            Tone::Error => &self.error,
            Tone::Fallback => &self.fallback,
        }
    }
}

pub trait StatusSink {
    fn report(&mut self, status: Status);
}

fn log_status(status: &Status) {
    match status.tone() {
        Tone::Error => tracing::warn!(status = %status, "status"),
        Tone::Fallback => tracing::warn!(status = %status, "status"),
        _ => tracing::info!(status = %status, "status"),
    }
}

/// Writes statuses into the page's status element.
pub struct StatusIndicator<'a> {
    doc: &'a mut Document,
    node: Option<NodeId>,
    palette: &'a StatusPalette,
}

impl<'a> StatusIndicator<'a> {
    /// Bind to `#status-indicator`; statuses are only logged when it is absent.
    pub fn attach(doc: &'a mut Document, palette: &'a StatusPalette) -> Self {
        let node = doc.element_by_id(STATUS_ELEMENT_ID);
        Self { doc, node, palette }
    }
}

impl StatusSink for StatusIndicator<'_> {
    fn report(&mut self, status: Status) {
        log_status(&status);
        if let Some(node) = self.node {
            self.doc.set_text(node, &status.to_string());
            self.doc
                .set_style(node, "background-color", self.palette.color(status.tone()));
        }
    }
}

/// Sink that only logs. Used when there is no page, e.g. by CLI commands.
#[derive(Debug, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn report(&mut self, status: Status) {
        log_status(&status);
    }
}

/// Sink that records every status, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub history: Vec<Status>,
}

impl StatusSink for Recorder {
    fn report(&mut self, status: Status) {
        log_status(&status);
        self.history.push(status);
    }
}
