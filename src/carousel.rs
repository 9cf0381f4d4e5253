//! Carousel rendering and slide navigation.
//!
//! A [`Carousel`] owns one category's slide state: which slide is active, the
//! slide and dot nodes it rendered, its auto-advance timer, the hover flag and
//! the touch origin. Rendering replaces the strip and dot contents wholesale,
//! so rendering twice never duplicates anything.
//!
//! ## Active state
//!
//! With `N > 0` slides exactly one slide and the dot at the same index carry
//! `active`. With `N = 0` nothing is active and the strip shows an error
//! placeholder.

use crate::dom::{Document, NodeId};
use crate::event::Handler;
use crate::registry::{CarouselSlots, modal_id};
use crate::timer::AutoAdvance;
use crate::types::{Category, MediaItem};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarouselId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("slide {requested} is out of range (carousel has {count} slides)")]
    SlideOutOfRange { requested: usize, count: usize },
}

#[derive(Debug)]
pub struct Carousel {
    id: CarouselId,
    key: String,
    slots: CarouselSlots,
    active: Option<usize>,
    slides: Vec<NodeId>,
    dots: Vec<NodeId>,
    timer: Option<AutoAdvance>,
    hovered: bool,
    touch_origin: Option<(f64, f64)>,
}

impl Carousel {
    pub fn new(id: CarouselId, key: &str, slots: CarouselSlots) -> Self {
        Self {
            id,
            key: key.to_string(),
            slots,
            active: None,
            slides: Vec::new(),
            dots: Vec::new(),
            timer: None,
            hovered: false,
            touch_origin: None,
        }
    }

    pub fn id(&self) -> CarouselId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slots(&self) -> &CarouselSlots {
        &self.slots
    }

    /// 0-based index of the active slide; `None` when empty.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[NodeId] {
        &self.slides
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn timer(&self) -> Option<&AutoAdvance> {
        self.timer.as_ref()
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render `entry` into the strip, dots and info region.
    ///
    /// `manifest_hint` names the manifest file in the empty-category placeholder.
    pub fn render(&mut self, doc: &mut Document, entry: &Category, manifest_hint: &str) {
        let strip = self.slots.strip;
        let dots = self.slots.dots;
        doc.clear_children(strip);
        doc.clear_children(dots);
        self.slides.clear();
        self.dots.clear();
        self.active = None;

        if entry.images.is_empty() {
            tracing::warn!(key = %self.key, "category has no media");
            render_placeholder(doc, strip, &self.key, manifest_hint, "300px", None);
            return;
        }

        for (index, item) in entry.images.iter().enumerate() {
            let slide = create_slide(doc, item);
            doc.add_class(slide, "carousel-image");
            doc.append_child(strip, slide);
            self.slides.push(slide);

            let dot = doc.append_element(dots, "span", &["dot"]);
            doc.set_on_click(
                dot,
                Handler::GoToSlide {
                    carousel: self.id,
                    slide: index + 1,
                },
            );
            self.dots.push(dot);
        }
        doc.add_class(self.slides[0], "active");
        doc.add_class(self.dots[0], "active");
        self.active = Some(0);

        if let Some(info) = self.slots.info {
            doc.clear_children(info);
            let h3 = doc.append_element(info, "h3", &[]);
            doc.append_text(h3, &entry.title);
            let p = doc.append_element(info, "p", &[]);
            doc.append_text(p, &entry.description);
            let button = doc.append_element(info, "button", &["btn", "btn-primary"]);
            doc.append_text(button, "See More");
            doc.set_on_click(
                button,
                Handler::OpenModal {
                    modal_id: modal_id(&self.key),
                },
            );
        }

        doc.force_reflow(strip);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move one slide in `direction`, wrapping at both ends. No-op when empty.
    pub fn advance(&mut self, doc: &mut Document, direction: Direction) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        let current = self.active.unwrap_or(0);
        doc.pause_and_rewind(self.slides[current]);
        let next = (current as isize + direction.step()).rem_euclid(count as isize) as usize;
        self.activate(doc, next);
    }

    /// Jump to 1-based slide `slide`. Every video is paused and rewound first.
    pub fn go_to(&mut self, doc: &mut Document, slide: usize) -> Result<usize, NavigationError> {
        let count = self.slides.len();
        if slide == 0 || slide > count {
            return Err(NavigationError::SlideOutOfRange {
                requested: slide,
                count,
            });
        }
        for s in &self.slides {
            doc.pause_and_rewind(*s);
        }
        self.activate(doc, slide - 1);
        Ok(slide - 1)
    }

    fn activate(&mut self, doc: &mut Document, index: usize) {
        for (i, (slide, dot)) in self.slides.iter().zip(&self.dots).enumerate() {
            if i == index {
                doc.add_class(*slide, "active");
                doc.set_style(*slide, "opacity", "1");
                doc.set_style(*slide, "z-index", "2");
                doc.add_class(*dot, "active");
            } else {
                doc.remove_class(*slide, "active");
                doc.set_style(*slide, "opacity", "0");
                doc.set_style(*slide, "z-index", "1");
                doc.remove_class(*dot, "active");
            }
        }
        doc.rewind_and_play(self.slides[index]);
        self.active = Some(index);
    }

    /// Whether the active slide is a video that is playing.
    pub fn is_playing_video(&self, doc: &Document) -> bool {
        self.active
            .and_then(|i| self.slides.get(i))
            .is_some_and(|s| doc.is_playing(*s))
    }

    // ------------------------------------------------------------------
    // Auto-advance, hover, touch
    // ------------------------------------------------------------------

    pub fn start_timer(&mut self, period: Duration) {
        self.timer = Some(AutoAdvance::start(period));
    }

    pub fn stop_timer(&mut self) {
        self.timer = None;
    }

    /// Pointer entered: auto-advance stops.
    pub fn hover_enter(&mut self) {
        self.hovered = true;
        self.stop_timer();
    }

    /// Pointer left: a fresh timer starts.
    pub fn hover_leave(&mut self, period: Duration) {
        self.hovered = false;
        self.start_timer(period);
    }

    /// Let `dt` pass on this carousel's timer. Returns how many steps it
    /// took. Ticks are skipped while hovered or while a video plays.
    ///
    /// Whole laps around the strip land on the same slide, so at most one lap
    /// plus the remainder is stepped through; a huge `dt` costs no more than a
    /// couple of laps.
    pub fn tick(&mut self, doc: &mut Document, dt: Duration) -> u32 {
        let fired = match self.timer.as_mut() {
            Some(timer) => timer.elapse(dt),
            None => return 0,
        };
        let count = u32::try_from(self.slides.len()).unwrap_or(u32::MAX);
        if self.hovered || count == 0 {
            return 0;
        }
        let steps = if fired > count {
            count + (fired - count) % count
        } else {
            fired
        };
        let mut advanced = 0;
        for _ in 0..steps {
            if self.is_playing_video(doc) {
                break;
            }
            self.advance(doc, Direction::Next);
            advanced += 1;
        }
        advanced
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.touch_origin = Some((x, y));
    }

    /// Finish a touch; returns the direction moved, if it was a swipe.
    ///
    /// Leftward swipes go to the next slide, rightward to the previous one.
    pub fn touch_end(&mut self, doc: &mut Document, x: f64, y: f64, threshold: f64) -> Option<Direction> {
        let (x0, y0) = self.touch_origin.take()?;
        let dx = x0 - x;
        let dy = y0 - y;
        if dx.abs() <= threshold || dx.abs() <= dy.abs() {
            return None;
        }
        let direction = if dx > 0.0 { Direction::Next } else { Direction::Prev };
        self.advance(doc, direction);
        Some(direction)
    }
}

/// `<video controls muted loop>` or `<img>` with the broken-slide handler.
fn create_slide(doc: &mut Document, item: &MediaItem) -> NodeId {
    if item.is_video() {
        let video = doc.create_element("video");
        doc.set_attr(video, "src", &item.src);
        doc.set_attr(video, "alt", &item.alt);
        doc.set_attr(video, "controls", "");
        doc.set_attr(video, "muted", "");
        doc.set_attr(video, "loop", "");
        doc.enable_playback(video);
        video
    } else {
        let img = doc.create_element("img");
        doc.set_attr(img, "src", &item.src);
        doc.set_attr(img, "alt", &item.alt);
        doc.set_on_error(img, Handler::FlagBrokenSlide);
        img
    }
}

/// Carousel image failed to load.
pub fn flag_broken_slide(doc: &mut Document, img: NodeId) {
    doc.set_style(img, "border", "2px solid red");
    doc.set_style(img, "background-color", "#ffebee");
}

/// Replace `container` content with the "no images" placeholder.
pub(crate) fn render_placeholder(
    doc: &mut Document,
    container: NodeId,
    key: &str,
    manifest_hint: &str,
    height: &str,
    margin: Option<&str>,
) {
    doc.clear_children(container);
    let placeholder = doc.append_element(container, "div", &["error-placeholder"]);
    for (property, value) in [
        ("display", "flex"),
        ("align-items", "center"),
        ("justify-content", "center"),
        ("height", height),
        ("background", "#ffebee"),
        ("border", "2px dashed #f44336"),
        ("color", "#c62828"),
    ] {
        doc.set_style(placeholder, property, value);
    }
    if let Some(margin) = margin {
        doc.set_style(placeholder, "margin", margin);
    }
    let inner = doc.append_element(placeholder, "div", &[]);
    doc.set_style(inner, "text-align", "center");
    let p = doc.append_element(inner, "p", &[]);
    doc.append_text(p, &format!("No images found for {key}"));
    let small = doc.append_element(inner, "small", &[]);
    doc.append_text(small, &format!("Check {manifest_hint}"));
}
