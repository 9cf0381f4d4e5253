//! End-to-end gallery sessions through the public API.
//!
//! Each test builds a host page, plugs in canned transports and drives the
//! session the way a browser would: start, clicks, keys, elapsed time.

use folio_gallery::carousel::Direction;
use folio_gallery::dom::Document;
use folio_gallery::event::{Event, Key};
use folio_gallery::gallery::{Gallery, GalleryError, GallerySettings};
use folio_gallery::loader::{FetchResponse, ManifestLoader, ManifestSource, Transport, TransportError};
use folio_gallery::page::build_host;
use folio_gallery::status::STATUS_ELEMENT_ID;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

enum Reply {
    Body(String),
    Status(u16, &'static str),
    Down,
}

struct Canned {
    name: &'static str,
    reply: Reply,
}

impl Transport for Canned {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch(&self, _url: &str) -> Result<FetchResponse, TransportError> {
        match &self.reply {
            Reply::Body(body) => Ok(FetchResponse::ok(body.clone())),
            Reply::Status(status, text) => Ok(FetchResponse {
                status: *status,
                status_text: text.to_string(),
                body: String::new(),
            }),
            Reply::Down => Err(TransportError::Network("connection refused".into())),
        }
    }
}

fn loader(replies: Vec<(&'static str, Reply)>) -> ManifestLoader {
    let transports: Vec<Box<dyn Transport>> = replies
        .into_iter()
        .map(|(name, reply)| Box::new(Canned { name, reply }) as Box<dyn Transport>)
        .collect();
    ManifestLoader::new("portfolio-manifest.json", "t", transports)
}

fn manifest_json(categories: &[(&str, usize)]) -> String {
    let entries: Vec<String> = categories
        .iter()
        .map(|(key, n)| {
            let images: Vec<String> = (0..*n)
                .map(|i| format!(r#"{{"src":"{key}/{i}.png","alt":"{key} {i}","description":"{key} caption {i}"}}"#))
                .collect();
            format!(
                r#""{key}":{{"title":"{key} title","description":"{key} text","images":[{}]}}"#,
                images.join(",")
            )
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn gallery(keys: &[&str], loader: ManifestLoader) -> Gallery {
    let mut doc = Document::new();
    build_host(&mut doc, keys.iter().map(|k| (*k, *k)));
    let settings = GallerySettings {
        interval: Duration::from_millis(4000),
        ..GallerySettings::default()
    };
    Gallery::new(doc, loader, settings)
}

fn status_text(g: &Gallery) -> String {
    let doc = g.document();
    let status = doc.element_by_id(STATUS_ELEMENT_ID).unwrap();
    doc.text_content(status)
}

fn active(g: &Gallery, key: &str) -> usize {
    g.carousel(key).unwrap().active().unwrap()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn single_category_renders_one_slide_and_info() {
    let json = r#"{"embedded":{"title":"T","description":"D","images":[{"src":"a.png","alt":"a","description":"d"}]}}"#;
    let mut g = gallery(&["embedded"], loader(vec![("http", Reply::Body(json.into()))]));
    assert_eq!(g.start(), 1);

    let carousel = g.carousel("embedded").unwrap();
    assert_eq!(carousel.slide_count(), 1);
    assert_eq!(carousel.dots().len(), 1);
    assert_eq!(carousel.active(), Some(0));

    let doc = g.document();
    let info = carousel.slots().info.unwrap();
    assert!(doc.inner_html(info).starts_with("<h3>T</h3><p>D</p>"));
    assert!(doc.text_content(info).ends_with("See More"));

    let modal = doc.element_by_id("embedded-modal").unwrap();
    let items = doc.find_all_by_class(modal, "modal-image-item");
    assert_eq!(items.len(), 1);
    let caption = doc.children(items[0])[1];
    assert_eq!(doc.tag(caption), Some("p"));
    assert_eq!(doc.text_content(caption), "d");
    assert_eq!(status_text(&g), "Updated 1 Categories");
}

#[test]
fn secondary_transport_used_when_primary_fails() {
    let json = manifest_json(&[("pcb", 2)]);
    let mut g = gallery(
        &["pcb"],
        loader(vec![("http", Reply::Status(404, "Not Found")), ("agent", Reply::Body(json))]),
    );
    g.start();
    assert_eq!(g.source(), Some(&ManifestSource::Transport("agent".into())));
    assert_eq!(g.carousel("pcb").unwrap().slide_count(), 2);
}

#[test]
fn both_transports_failing_render_fallback_catalog() {
    let keys = ["embedded", "pcb", "gui", "testbox"];
    let mut g = gallery(&keys, loader(vec![("http", Reply::Down), ("agent", Reply::Body("{not json".into()))]));
    assert_eq!(g.start(), 4);
    assert_eq!(g.source(), Some(&ManifestSource::Fallback));
    for key in keys {
        assert!(g.carousel(key).unwrap().slide_count() >= 1, "{key}");
    }
}

#[test]
fn empty_category_shows_placeholder_and_is_not_counted() {
    let json = manifest_json(&[("a", 2), ("b", 0)]);
    let mut g = gallery(&["a", "b"], loader(vec![("file", Reply::Body(json))]));
    assert_eq!(g.start(), 1);

    let doc = g.document();
    let strip = g.carousel("b").unwrap().slots().strip;
    assert!(doc.text_content(strip).contains("No images found for b"));
    assert!(doc.find_by_class(strip, "error-placeholder").is_some());
    assert_eq!(g.carousel("b").unwrap().active(), None);
}

#[test]
fn categories_without_container_are_skipped() {
    let json = manifest_json(&[("a", 1), ("ghost", 3)]);
    let mut g = gallery(&["a"], loader(vec![("file", Reply::Body(json))]));
    assert_eq!(g.start(), 1);
    assert!(g.carousel("ghost").is_none());
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

fn three_slides() -> Gallery {
    let json = manifest_json(&[("k", 3)]);
    let mut g = gallery(&["k"], loader(vec![("file", Reply::Body(json))]));
    g.start();
    g
}

#[test]
fn prev_from_first_wraps_to_last() {
    let mut g = three_slides();
    g.advance("k", Direction::Prev).unwrap();
    assert_eq!(active(&g, "k"), 2);
}

#[test]
fn n_advances_return_to_start() {
    let mut g = three_slides();
    for step in 1..=3 {
        g.advance("k", Direction::Next).unwrap();
        assert_eq!(active(&g, "k"), step % 3);
    }
}

#[test]
fn exactly_one_active_slide_and_dot() {
    let mut g = three_slides();
    g.advance("k", Direction::Next).unwrap();
    let carousel = g.carousel("k").unwrap();
    let doc = g.document();
    let active_slides = carousel.slides().iter().filter(|s| doc.has_class(**s, "active")).count();
    let active_dots = carousel.dots().iter().filter(|d| doc.has_class(**d, "active")).count();
    assert_eq!((active_slides, active_dots), (1, 1));
    assert!(doc.has_class(carousel.dots()[1], "active"));
}

#[test]
fn go_to_is_one_based_and_rejects_out_of_range() {
    let mut g = three_slides();
    assert_eq!(g.go_to("k", 2).unwrap(), 1);
    assert_eq!(active(&g, "k"), 1);
    assert!(matches!(g.go_to("k", 0), Err(GalleryError::Navigation(_))));
    assert!(matches!(g.go_to("k", 4), Err(GalleryError::Navigation(_))));
    assert_eq!(active(&g, "k"), 1);
    assert!(matches!(g.go_to("nope", 1), Err(GalleryError::UnknownCategory(_))));
}

#[test]
fn timer_advances_and_hover_pauses() {
    let mut g = three_slides();
    g.advance_time(Duration::from_millis(4000));
    assert_eq!(active(&g, "k"), 1);

    let root = g.carousel("k").unwrap().slots().root;
    g.dispatch(Event::PointerEnter { target: root });
    g.advance_time(Duration::from_millis(12_000));
    assert_eq!(active(&g, "k"), 1);

    g.dispatch(Event::PointerLeave { target: root });
    g.advance_time(Duration::from_millis(4000));
    assert_eq!(active(&g, "k"), 2);
}

#[test]
fn swipe_left_goes_next() {
    let mut g = three_slides();
    let strip = g.carousel("k").unwrap().slots().strip;
    g.dispatch(Event::TouchStart { target: strip, x: 300.0, y: 0.0 });
    g.dispatch(Event::TouchEnd { target: strip, x: 100.0, y: 5.0 });
    assert_eq!(active(&g, "k"), 1);
}

#[test]
fn restart_does_not_duplicate_slides() {
    let mut g = three_slides();
    g.start();
    let carousel = g.carousel("k").unwrap();
    let doc = g.document();
    assert_eq!(doc.find_all_by_class(carousel.slots().strip, "carousel-image").len(), 3);
    assert_eq!(doc.children(carousel.slots().dots).len(), 3);
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

#[test]
fn see_more_opens_modal_and_escape_closes_it() {
    let mut g = three_slides();
    let info = g.carousel("k").unwrap().slots().info.unwrap();
    let button = g.document().find_by_class(info, "btn").unwrap();

    let outcome = g.dispatch(Event::Click { target: button });
    assert!(outcome.default_prevented);
    let modal = g.document().element_by_id("k-modal").unwrap();
    assert_eq!(g.document().style(modal, "display"), Some("block"));
    assert_eq!(
        g.document().find_all_by_class(modal, "modal-image-item").len(),
        3
    );

    g.dispatch(Event::KeyDown { key: Key::Escape });
    assert_eq!(g.document().style(modal, "display"), Some("none"));
    let body = g.document().body();
    assert_eq!(g.document().style(body, "overflow"), Some("auto"));
}

#[test]
fn unknown_modal_is_an_error() {
    let mut g = three_slides();
    assert_eq!(
        g.open_modal("missing-modal"),
        Err(GalleryError::UnknownModal("missing-modal".into()))
    );
}
