//! Modal gallery rendering and visibility.
//!
//! The modal shows every item of a category at once: one
//! `div.modal-image-item[data-index]` per item holding the media and a caption.
//! Rendering replaces the gallery contents, so a forced reload supersedes the
//! previous render completely.

use crate::carousel::render_placeholder;
use crate::dom::{Document, NodeId};
use crate::event::Handler;
use crate::registry::ModalSlots;
use crate::types::{Category, MediaItem};

const IMAGE_STYLE: &[(&str, &str)] = &[
    ("width", "100%"),
    ("max-height", "400px"),
    ("object-fit", "contain"),
    ("border-radius", "0.5rem"),
    ("background", "white"),
    ("display", "block"),
    ("min-height", "200px"),
    ("border", "1px solid #dee2e6"),
];

const ERROR_OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "50%"),
    ("left", "50%"),
    ("transform", "translate(-50%, -50%)"),
    ("background", "rgba(255,0,0,0.8)"),
    ("color", "white"),
    ("padding", "10px"),
    ("border-radius", "4px"),
    ("font-size", "12px"),
    ("text-align", "center"),
];

/// Render `entry` into the modal gallery of `key`.
pub fn render(doc: &mut Document, slots: &ModalSlots, key: &str, entry: &Category, manifest_hint: &str) {
    let gallery = slots.gallery;
    if entry.images.is_empty() {
        render_placeholder(doc, gallery, key, manifest_hint, "200px", Some("20px 0"));
        return;
    }

    doc.clear_children(gallery);
    for (index, item) in entry.images.iter().enumerate() {
        let wrapper = doc.append_element(gallery, "div", &["modal-image-item"]);
        doc.set_attr(wrapper, "data-index", &index.to_string());
        let media = create_media(doc, item);
        doc.append_child(wrapper, media);
        let caption = doc.append_element(wrapper, "p", &[]);
        doc.append_text(caption, &item.description);
    }
}

fn create_media(doc: &mut Document, item: &MediaItem) -> NodeId {
    if item.is_video() {
        let video = doc.create_element("video");
        doc.set_attr(video, "src", &item.src);
        doc.set_attr(video, "controls", "");
        doc.set_attr(video, "muted", "");
        doc.set_attr(video, "preload", "metadata");
        doc.enable_playback(video);
        video
    } else {
        let img = doc.create_element("img");
        doc.set_attr(img, "src", &item.src);
        doc.set_attr(img, "alt", &item.alt);
        for (property, value) in IMAGE_STYLE {
            doc.set_style(img, property, value);
        }
        doc.set_on_error(
            img,
            Handler::FlagBrokenModalMedia {
                src: item.src.clone(),
            },
        );
        img
    }
}

/// Modal gallery image failed to load: mark it and overlay the failing path.
pub fn flag_broken_media(doc: &mut Document, img: NodeId, src: &str) {
    doc.set_style(img, "border", "3px solid red");
    doc.set_style(img, "background-color", "#ffebee");
    doc.set_attr(img, "alt", &format!("Failed to load: {src}"));

    let Some(wrapper) = doc.parent(img) else {
        return;
    };
    if doc.find_by_class(wrapper, "media-error").is_some() {
        return;
    }
    doc.set_style(wrapper, "position", "relative");
    let overlay = doc.append_element(wrapper, "div", &["media-error"]);
    for (property, value) in ERROR_OVERLAY_STYLE {
        doc.set_style(overlay, property, value);
    }
    let strong = doc.append_element(overlay, "strong", &[]);
    doc.append_text(strong, "Image Load Error:");
    doc.append_element(overlay, "br", &[]);
    doc.append_text(overlay, src);
}

pub fn is_visible(doc: &Document, slots: &ModalSlots) -> bool {
    doc.style(slots.root, "display") == Some("block")
}

/// Whether the gallery still shows its initial loading placeholder.
pub fn is_loading(doc: &Document, slots: &ModalSlots) -> bool {
    doc.find_by_class(slots.gallery, "loading-placeholder").is_some()
}

/// Show the modal and stop the page from scrolling.
pub fn show(doc: &mut Document, slots: &ModalSlots) {
    doc.set_style(slots.root, "display", "block");
    let body = doc.body();
    doc.set_style(body, "overflow", "hidden");
}

/// Hide the modal and let the page scroll again.
pub fn hide(doc: &mut Document, slots: &ModalSlots) {
    doc.set_style(slots.root, "display", "none");
    let body = doc.body();
    doc.set_style(body, "overflow", "auto");
}
