//! The interactive gallery session.
//!
//! A [`Gallery`] owns the document, the category registry and the manifest
//! loader. [`Gallery::start`] loads the manifest once and renders every
//! registered category in manifest order; afterwards the host drives the
//! session with [`Gallery::dispatch`] (input events) and
//! [`Gallery::advance_time`] (auto-advance timers).
//!
//! ## Lifecycle
//!
//! ```text
//! new ──► start: Loading ──► ManifestLoaded | Failed + UsingFallback
//!                 ──► render categories ──► Updated(n) ──► timers running
//! ```
//!
//! Everything is single-threaded. Each carousel owns its timer; elapsed time
//! is applied to each carousel independently.

use crate::carousel::{self, Carousel, CarouselId, Direction, NavigationError};
use crate::config::{SiteConfig, StatusPalette};
use crate::dom::{Document, NodeId};
use crate::event::{Event, EventOutcome, Handler, Key};
use crate::loader::{ManifestLoader, ManifestSource};
use crate::modal;
use crate::page;
use crate::registry::{self, ModalSlots, Registry};
use crate::status::{Status, StatusIndicator, StatusSink};
use crate::types::Manifest;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GalleryError {
    #[error("no modal with id {0}")]
    UnknownModal(String),
    #[error("no carousel for category {0}")]
    UnknownCategory(String),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Session settings, taken from the site configuration.
#[derive(Debug, Clone)]
pub struct GallerySettings {
    pub interval: Duration,
    pub swipe_threshold: f64,
    /// Manifest file named in empty-category placeholders.
    pub manifest_hint: String,
    pub palette: StatusPalette,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl GallerySettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.carousel.interval_ms),
            swipe_threshold: config.carousel.swipe_threshold,
            manifest_hint: config.manifest.file_name().to_string(),
            palette: config.status.clone(),
        }
    }
}

pub struct Gallery {
    doc: Document,
    registry: Registry,
    loader: ManifestLoader,
    settings: GallerySettings,
    manifest: Option<Manifest>,
    source: Option<ManifestSource>,
}

impl Gallery {
    /// Take over `doc`, registering every `[data-category]` element in it.
    pub fn new(mut doc: Document, loader: ManifestLoader, settings: GallerySettings) -> Self {
        let keys: Vec<String> = doc
            .descendants(doc.body())
            .into_iter()
            .filter_map(|n| doc.attr(n, "data-category").map(str::to_string))
            .collect();
        let mut registry = Registry::new();
        registry.register_all(&mut doc, keys.iter().map(String::as_str));
        Self {
            doc,
            registry,
            loader,
            settings,
            manifest: None,
            source: None,
        }
    }

    /// A session over a freshly built host page for the configured categories.
    pub fn with_host(config: &SiteConfig, loader: ManifestLoader) -> Self {
        let mut doc = Document::new();
        page::build_host(
            &mut doc,
            config.categories.iter().map(|c| (c.key.as_str(), c.title.as_str())),
        );
        Self::new(doc, loader, GallerySettings::from_config(config))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for hosts that adjust the page, e.g. to move focus.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    /// The manifest rendered by [`start`](Self::start), once it ran.
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn source(&self) -> Option<&ManifestSource> {
        self.source.as_ref()
    }

    pub fn carousel(&self, key: &str) -> Option<&Carousel> {
        self.registry
            .carousel_for(key)
            .and_then(|id| self.registry.carousel(id))
    }

    /// Load the manifest, render every registered category and start the
    /// auto-advance timers. Returns the number of non-empty categories.
    pub fn start(&mut self) -> usize {
        let outcome = {
            let mut status = StatusIndicator::attach(&mut self.doc, &self.settings.palette);
            self.loader.load(&mut status)
        };

        let mut updated = 0;
        for (key, entry) in outcome.manifest.iter() {
            let Some(id) = self.registry.carousel_for(key) else {
                tracing::debug!(key, "no container for category, skipping");
                continue;
            };
            if let Some(carousel) = self.registry.carousel_mut(id) {
                carousel.render(&mut self.doc, entry, &self.settings.manifest_hint);
            }
            match self.registry.modal(key) {
                Some(slots) => modal::render(&mut self.doc, slots, key, entry, &self.settings.manifest_hint),
                None => tracing::warn!(key, "no modal for category"),
            }
            if !entry.images.is_empty() {
                updated += 1;
            }
        }

        StatusIndicator::attach(&mut self.doc, &self.settings.palette).report(Status::Updated(updated));

        for carousel in self.registry.carousels_mut() {
            carousel.start_timer(self.settings.interval);
        }
        self.manifest = Some(outcome.manifest);
        self.source = Some(outcome.source);
        updated
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn carousel_id(&self, key: &str) -> Result<CarouselId, GalleryError> {
        self.registry
            .carousel_for(key)
            .ok_or_else(|| GalleryError::UnknownCategory(key.to_string()))
    }

    pub fn advance(&mut self, key: &str, direction: Direction) -> Result<(), GalleryError> {
        let id = self.carousel_id(key)?;
        if let Some(carousel) = self.registry.carousel_mut(id) {
            carousel.advance(&mut self.doc, direction);
        }
        Ok(())
    }

    /// Jump carousel `key` to 1-based `slide`.
    pub fn go_to(&mut self, key: &str, slide: usize) -> Result<usize, GalleryError> {
        let id = self.carousel_id(key)?;
        let carousel = self
            .registry
            .carousel_mut(id)
            .ok_or_else(|| GalleryError::UnknownCategory(key.to_string()))?;
        Ok(carousel.go_to(&mut self.doc, slide)?)
    }

    /// Let `dt` pass on every carousel's timer.
    pub fn advance_time(&mut self, dt: Duration) {
        for carousel in self.registry.carousels_mut() {
            carousel.tick(&mut self.doc, dt);
        }
    }

    // ------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------

    fn modal_slots(&self, modal_id: &str) -> Result<(String, ModalSlots), GalleryError> {
        self.registry
            .modal_by_id(modal_id)
            .map(|(key, slots)| (key.to_string(), slots.clone()))
            .ok_or_else(|| GalleryError::UnknownModal(modal_id.to_string()))
    }

    /// Show a modal. If its gallery was never rendered, that category is
    /// fetched again and rendered first.
    pub fn open_modal(&mut self, modal_id: &str) -> Result<EventOutcome, GalleryError> {
        let (key, slots) = self.modal_slots(modal_id).inspect_err(|_| {
            tracing::warn!(modal_id, "modal not found");
        })?;
        if modal::is_loading(&self.doc, &slots) {
            tracing::debug!(key, "modal still loading, reloading category");
            match self.loader.reload_category(&key) {
                Some(entry) => {
                    modal::render(&mut self.doc, &slots, &key, &entry, &self.settings.manifest_hint)
                }
                None => tracing::warn!(key, "category missing from reloaded manifest"),
            }
        }
        modal::show(&mut self.doc, &slots);
        Ok(EventOutcome::prevented())
    }

    pub fn close_modal(&mut self, modal_id: &str) -> Result<(), GalleryError> {
        let (_, slots) = self.modal_slots(modal_id).inspect_err(|_| {
            tracing::warn!(modal_id, "modal not found for closing");
        })?;
        modal::hide(&mut self.doc, &slots);
        Ok(())
    }

    fn close_visible_modals(&mut self) -> bool {
        let visible: Vec<ModalSlots> = self
            .registry
            .modals()
            .filter(|(_, slots)| modal::is_visible(&self.doc, slots))
            .map(|(_, slots)| slots.clone())
            .collect();
        for slots in &visible {
            modal::hide(&mut self.doc, slots);
        }
        !visible.is_empty()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn dispatch(&mut self, event: Event) -> EventOutcome {
        match event {
            Event::Click { target } => self.click(target),
            Event::PointerEnter { target } => {
                if let Some(c) = self.carousel_at(target) {
                    c.hover_enter();
                }
                EventOutcome::ignored()
            }
            Event::PointerLeave { target } => {
                let period = self.settings.interval;
                if let Some(c) = self.carousel_at(target) {
                    c.hover_leave(period);
                }
                EventOutcome::ignored()
            }
            Event::TouchStart { target, x, y } => {
                if let Some(c) = self.carousel_at(target) {
                    c.touch_start(x, y);
                }
                EventOutcome::ignored()
            }
            Event::TouchMove { target } => {
                if self.registry.carousel_containing(&self.doc, target).is_some() {
                    EventOutcome::prevented()
                } else {
                    EventOutcome::ignored()
                }
            }
            Event::TouchEnd { target, x, y } => {
                let threshold = self.settings.swipe_threshold;
                if let Some(id) = self.registry.carousel_containing(&self.doc, target)
                    && let Some(c) = self.registry.carousel_mut(id)
                {
                    c.touch_end(&mut self.doc, x, y, threshold);
                }
                EventOutcome::ignored()
            }
            Event::KeyDown { key } => self.key_down(key),
            Event::MediaError { target } => {
                match self.doc.on_error(target).cloned() {
                    Some(Handler::FlagBrokenSlide) => carousel::flag_broken_slide(&mut self.doc, target),
                    Some(Handler::FlagBrokenModalMedia { src }) => {
                        modal::flag_broken_media(&mut self.doc, target, &src)
                    }
                    _ => {}
                }
                EventOutcome::ignored()
            }
            Event::Play { target } => {
                self.doc.set_paused(target, false);
                EventOutcome::ignored()
            }
            Event::Pause { target } => {
                self.doc.set_paused(target, true);
                EventOutcome::ignored()
            }
        }
    }

    fn carousel_at(&mut self, node: NodeId) -> Option<&mut Carousel> {
        let id = self.registry.carousel_containing(&self.doc, node)?;
        self.registry.carousel_mut(id)
    }

    /// Run the closest click handler, then the backdrop check.
    fn click(&mut self, target: NodeId) -> EventOutcome {
        let handler = self
            .doc
            .closest(target, |n| self.doc.on_click(n).is_some())
            .and_then(|n| self.doc.on_click(n).cloned());

        let outcome = match handler {
            Some(handler) => self.run_click_handler(handler),
            None => EventOutcome::ignored(),
        };

        // Backdrop: the click landed on the overlay itself, not its content.
        if self.doc.has_class(target, "modal")
            && let Some(key) = self.registry.modal_with_root(target)
        {
            let modal_id = registry::modal_id(key);
            let _ = self.close_modal(&modal_id);
        }
        outcome
    }

    fn run_click_handler(&mut self, handler: Handler) -> EventOutcome {
        match handler {
            Handler::Advance { carousel, direction } => {
                if let Some(c) = self.registry.carousel_mut(carousel) {
                    c.advance(&mut self.doc, direction);
                }
                EventOutcome::ignored()
            }
            Handler::GoToSlide { carousel, slide } => {
                if let Some(c) = self.registry.carousel_mut(carousel)
                    && let Err(e) = c.go_to(&mut self.doc, slide)
                {
                    tracing::warn!(error = %e, "dot navigation failed");
                }
                EventOutcome::ignored()
            }
            Handler::OpenModal { modal_id } => {
                // The trigger's default action is suppressed even when the
                // modal is missing.
                self.open_modal(&modal_id).unwrap_or_else(|_| EventOutcome::prevented())
            }
            Handler::CloseModal { modal_id } => {
                let _ = self.close_modal(&modal_id);
                EventOutcome::ignored()
            }
            Handler::FlagBrokenSlide | Handler::FlagBrokenModalMedia { .. } => EventOutcome::ignored(),
        }
    }

    fn key_down(&mut self, key: Key) -> EventOutcome {
        if key == Key::Escape {
            self.close_visible_modals();
            return EventOutcome::ignored();
        }
        let direction = match key {
            Key::ArrowLeft => Direction::Prev,
            Key::ArrowRight => Direction::Next,
            _ => return EventOutcome::ignored(),
        };
        let Some(focused) = self.doc.focused() else {
            return EventOutcome::ignored();
        };
        let Some(id) = self.registry.carousel_containing(&self.doc, focused) else {
            return EventOutcome::ignored();
        };
        if let Some(c) = self.registry.carousel_mut(id) {
            c.advance(&mut self.doc, direction);
        }
        EventOutcome::prevented()
    }
}
