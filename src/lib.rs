//! # Folio Gallery
//!
//! A portfolio gallery: each category of work gets an auto-advancing carousel
//! and a modal listing every item. The list of media comes from a JSON
//! manifest; if it cannot be fetched, a compiled-in catalog takes its place
//! so the page never renders empty.
//!
//! # Architecture
//!
//! ```text
//! config.toml ──► SiteConfig ──► page::build_host ──► Document (arena DOM)
//!                                                          │
//! manifest ──► ManifestLoader (transport chain → fallback) │
//!                     │                                    ▼
//!                     └──────────────► Gallery::start ──► carousels + modals
//!                                          │
//!                      Event / elapsed time ──► Gallery::dispatch / advance_time
//! ```
//!
//! The browser-side behavior is modeled on an explicit [`dom::Document`]: the
//! renderers build subtrees in it, the controllers mutate classes and styles
//! on it, and [`page::render_page`] serializes it to the static page the
//! `build` command writes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`loader`] | Manifest loading through an ordered chain of transports, with fallback and status reporting |
//! | [`catalog`] | Compiled-in fallback manifest, default categories, well-known filenames |
//! | [`probe`] | Media existence checks: filter lists, discover media without a manifest |
//! | [`carousel`] | Carousel rendering and slide navigation (buttons, dots, timers, swipes) |
//! | [`modal`] | Modal gallery rendering, visibility and broken-media treatment |
//! | [`gallery`] | The session: startup, event dispatch, modal open/close, timers |
//! | [`registry`] | Binds category keys to their carousel and modal containers |
//! | [`page`] | Host page skeleton and HTML shell |
//! | [`dom`] | Arena document the renderers and controllers operate on |
//! | [`event`] | Input events and the handlers attached to elements |
//! | [`timer`] | Per-carousel auto-advance timer on a virtual clock |
//! | [`status`] | Status indicator and status sinks |
//! | [`scan`] | Manifest generation from the category folders on disk |
//! | [`generate`] | Static site build: page plus copied media |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Manifest types: `MediaItem`, `Category`, ordered `Manifest` |
//! | [`naming`] | `NNN-name` filename convention and alt text derivation |
//! | [`metadata`] | Caption resolution: sidecar file, curated caption, filename |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Document Instead of Ambient Globals
//!
//! Renderers receive the `NodeId`s of their containers and operate on a
//! `Document` passed in by the caller. Category containers are bound once
//! through the [`registry`], so nothing searches the page by selector after
//! startup and every operation is testable without a browser.
//!
//! ## Fallback Is Data
//!
//! The loader walks a `Vec<Box<dyn Transport>>` and records every failure.
//! When the chain is exhausted it returns the compiled-in catalog together
//! with those failures, so callers can report exactly what went wrong.
//!
//! ## Timers on a Virtual Clock
//!
//! Each carousel owns its auto-advance timer; time only moves when the host
//! calls [`gallery::Gallery::advance_time`]. Hover pauses and touch resets are
//! therefore deterministic in tests.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod event;
pub mod gallery;
pub mod generate;
pub mod loader;
pub mod metadata;
pub mod modal;
pub mod naming;
pub mod output;
pub mod page;
pub mod probe;
pub mod registry;
pub mod scan;
pub mod status;
pub mod timer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
