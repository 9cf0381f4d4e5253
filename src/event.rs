//! Input events and the behaviors nodes attach to them.
//!
//! The host (a test, the CLI build, or an embedding application) feeds
//! [`Event`]s into [`Gallery::dispatch`](crate::gallery::Gallery::dispatch).
//! Renderers never hold callbacks; they attach a [`Handler`] value to a node,
//! and dispatch interprets it.

use crate::carousel::{CarouselId, Direction};
use crate::dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click { target: NodeId },
    PointerEnter { target: NodeId },
    PointerLeave { target: NodeId },
    /// Touch coordinates are client pixels.
    TouchStart { target: NodeId, x: f64, y: f64 },
    TouchMove { target: NodeId },
    TouchEnd { target: NodeId, x: f64, y: f64 },
    /// Delivered to the focused element, or the body when nothing has focus.
    KeyDown { key: Key },
    /// A media element failed to load its source.
    MediaError { target: NodeId },
    Play { target: NodeId },
    Pause { target: NodeId },
}

/// What happened to the event's default browser action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
}

impl EventOutcome {
    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
        }
    }

    pub fn ignored() -> Self {
        Self::default()
    }
}

/// Behavior attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    /// Prev/next buttons.
    Advance {
        carousel: CarouselId,
        direction: Direction,
    },
    /// Indicator dots. `slide` is 1-based.
    GoToSlide { carousel: CarouselId, slide: usize },
    OpenModal { modal_id: String },
    CloseModal { modal_id: String },
    /// Error handler of a carousel `<img>`.
    FlagBrokenSlide,
    /// Error handler of a modal gallery `<img>`.
    FlagBrokenModalMedia { src: String },
}

impl Handler {
    /// `data-action` attribute for the serialized page, read by the page
    /// script. Load-error handlers go to [`data_on_error`](Self::data_on_error).
    pub fn data_action(&self) -> Option<String> {
        match self {
            Handler::Advance { direction, .. } => Some(match direction {
                Direction::Prev => "advance:prev".to_string(),
                Direction::Next => "advance:next".to_string(),
            }),
            Handler::GoToSlide { slide, .. } => Some(format!("goto:{slide}")),
            Handler::OpenModal { modal_id } => Some(format!("open:{modal_id}")),
            Handler::CloseModal { modal_id } => Some(format!("close:{modal_id}")),
            Handler::FlagBrokenSlide | Handler::FlagBrokenModalMedia { .. } => None,
        }
    }

    /// `data-on-error` attribute: which broken-media treatment the page
    /// script applies. The failing path is the element's own `src`.
    pub fn data_on_error(&self) -> Option<&'static str> {
        match self {
            Handler::FlagBrokenSlide => Some("slide"),
            Handler::FlagBrokenModalMedia { .. } => Some("modal"),
            _ => None,
        }
    }
}
