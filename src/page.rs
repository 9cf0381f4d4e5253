//! Page skeleton and HTML shell.
//!
//! [`build_host`] creates the per-category containers the registry binds to,
//! each pre-filled with a loading placeholder, plus one modal per category and
//! the status indicator. [`render_page`] wraps the serialized document body in
//! the HTML shell with the stylesheet and page script inlined.

use crate::config::CarouselConfig;
use crate::dom::{Document, NodeId};
use crate::event::Handler;
use crate::registry::modal_id;
use crate::status::STATUS_ELEMENT_ID;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

fn loading_placeholder(doc: &mut Document, parent: NodeId) {
    let placeholder = doc.append_element(parent, "div", &["loading-placeholder"]);
    doc.append_text(placeholder, "Loading...");
}

/// Build the host skeleton for `(key, title)` pairs, in order.
///
/// Returns the grid element holding the portfolio items.
pub fn build_host<'a>(doc: &mut Document, categories: impl IntoIterator<Item = (&'a str, &'a str)>) -> NodeId {
    let body = doc.body();
    let status = doc.append_element(body, "div", &[]);
    doc.set_id(status, STATUS_ELEMENT_ID);

    let section = doc.append_element(body, "section", &["portfolio"]);
    doc.set_id(section, "portfolio");
    let grid = doc.append_element(section, "div", &["portfolio-grid"]);

    let mut modals = Vec::new();
    for (key, title) in categories {
        let item = doc.append_element(grid, "div", &["portfolio-item"]);
        doc.set_attr(item, "data-category", key);

        let carousel = doc.append_element(item, "div", &["portfolio-image-carousel"]);
        let strip = doc.append_element(carousel, "div", &["carousel-container"]);
        loading_placeholder(doc, strip);
        let prev = doc.append_element(carousel, "button", &["carousel-btn", "prev"]);
        doc.append_text(prev, "‹");
        let next = doc.append_element(carousel, "button", &["carousel-btn", "next"]);
        doc.append_text(next, "›");
        doc.append_element(carousel, "div", &["carousel-dots"]);

        let info = doc.append_element(item, "div", &["portfolio-info"]);
        let h3 = doc.append_element(info, "h3", &[]);
        doc.append_text(h3, title);

        modals.push((key, title));
    }

    for (key, title) in modals {
        let id = modal_id(key);
        let modal = doc.append_element(body, "div", &["modal"]);
        doc.set_id(modal, &id);
        doc.set_style(modal, "display", "none");
        let content = doc.append_element(modal, "div", &["modal-content"]);
        let close = doc.append_element(content, "span", &["close"]);
        doc.append_text(close, "×");
        doc.set_on_click(close, Handler::CloseModal { modal_id: id });
        let h2 = doc.append_element(content, "h2", &[]);
        doc.append_text(h2, title);
        let gallery = doc.append_element(content, "div", &["modal-images-gallery"]);
        loading_placeholder(doc, gallery);
    }

    grid
}

fn base_document(title: &str, css: &str, carousel: &CarouselConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-interval=(carousel.interval_ms) data-swipe-threshold=(carousel.swipe_threshold) {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Serialize `doc` into a complete HTML page.
///
/// The auto-advance period and swipe threshold are handed to the page script
/// as `data-interval` and `data-swipe-threshold` on `<body>`.
pub fn render_page(title: &str, carousel: &CarouselConfig, doc: &Document) -> Markup {
    let body_html = doc.inner_html(doc.body());
    base_document(title, CSS, carousel, html! {
        header.site-header {
            h1 { (title) }
        }
        (PreEscaped(body_html))
    })
}
