//! Category ↔ document wiring.
//!
//! Each category key is bound to its document slots exactly once, by
//! [`Registry::register`]. Renderers then receive the located [`NodeId`]s
//! instead of searching the document on every render. The document contract
//! per key `K`:
//!
//! ```text
//! [data-category=K]
//!   .portfolio-image-carousel
//!     .carousel-container      (required)
//!     .carousel-btn.prev/.next (optional)
//!     .carousel-dots           (required)
//!   .portfolio-info            (optional)
//! #K-modal                     (optional)
//!   .modal-images-gallery      (required when the modal exists)
//! ```

use crate::carousel::{Carousel, CarouselId, Direction};
use crate::dom::{Document, NodeId};
use crate::event::Handler;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no element with data-category=\"{0}\"")]
    MissingCategory(String),
    #[error("category {key}: missing .{slot}")]
    MissingSlot { key: String, slot: &'static str },
    #[error("category {0} is already registered")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSlots {
    /// The `[data-category]` element.
    pub item: NodeId,
    /// `.portfolio-image-carousel`, or the item itself when there is no
    /// dedicated wrapper.
    pub root: NodeId,
    pub strip: NodeId,
    pub dots: NodeId,
    pub info: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSlots {
    pub root: NodeId,
    pub gallery: NodeId,
}

/// `K-modal`
pub fn modal_id(key: &str) -> String {
    format!("{key}-modal")
}

impl CarouselSlots {
    pub fn locate(doc: &Document, key: &str) -> Result<Self, RegistryError> {
        let item = doc
            .find_by_attr("data-category", key)
            .ok_or_else(|| RegistryError::MissingCategory(key.to_string()))?;
        let missing = |slot| RegistryError::MissingSlot {
            key: key.to_string(),
            slot,
        };
        let root = doc
            .find_by_class(item, "portfolio-image-carousel")
            .unwrap_or(item);
        let strip = doc
            .find_by_class(item, "carousel-container")
            .ok_or_else(|| missing("carousel-container"))?;
        let dots = doc
            .find_by_class(item, "carousel-dots")
            .ok_or_else(|| missing("carousel-dots"))?;
        let button = |side: &str| {
            doc.find_all_by_class(item, "carousel-btn")
                .into_iter()
                .find(|b| doc.has_class(*b, side))
        };
        Ok(Self {
            item,
            root,
            strip,
            dots,
            info: doc.find_by_class(item, "portfolio-info"),
            prev: button("prev"),
            next: button("next"),
        })
    }
}

impl ModalSlots {
    /// `Ok(None)` when the page has no modal for `key`.
    pub fn locate(doc: &Document, key: &str) -> Result<Option<Self>, RegistryError> {
        let Some(root) = doc.element_by_id(&modal_id(key)) else {
            return Ok(None);
        };
        let gallery = doc
            .find_by_class(root, "modal-images-gallery")
            .ok_or_else(|| RegistryError::MissingSlot {
                key: key.to_string(),
                slot: "modal-images-gallery",
            })?;
        Ok(Some(Self { root, gallery }))
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    carousels: Vec<Carousel>,
    modals: Vec<(String, ModalSlots)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to its slots and wire the prev/next buttons.
    pub fn register(&mut self, doc: &mut Document, key: &str) -> Result<CarouselId, RegistryError> {
        if self.carousel_for(key).is_some() {
            return Err(RegistryError::Duplicate(key.to_string()));
        }
        let slots = CarouselSlots::locate(doc, key)?;
        let modal = ModalSlots::locate(doc, key)?;
        let id = CarouselId(self.carousels.len());

        for (button, direction) in [(slots.prev, Direction::Prev), (slots.next, Direction::Next)] {
            if let Some(button) = button {
                doc.set_on_click(
                    button,
                    Handler::Advance {
                        carousel: id,
                        direction,
                    },
                );
            }
        }
        doc.set_attr(slots.root, "tabindex", "0");

        self.carousels.push(Carousel::new(id, key, slots));
        if let Some(modal) = modal {
            self.modals.push((key.to_string(), modal));
        }
        tracing::debug!(key, carousel = id.0, "registered category");
        Ok(id)
    }

    /// Register every key, logging and skipping those the document lacks.
    pub fn register_all<'a>(&mut self, doc: &mut Document, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if let Err(e) = self.register(doc, key) {
                tracing::debug!(key, error = %e, "category not registered");
            }
        }
    }

    pub fn carousel(&self, id: CarouselId) -> Option<&Carousel> {
        self.carousels.get(id.0)
    }

    pub fn carousel_mut(&mut self, id: CarouselId) -> Option<&mut Carousel> {
        self.carousels.get_mut(id.0)
    }

    pub fn carousel_for(&self, key: &str) -> Option<CarouselId> {
        self.carousels.iter().find(|c| c.key() == key).map(|c| c.id())
    }

    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    pub fn carousels_mut(&mut self) -> &mut [Carousel] {
        &mut self.carousels
    }

    /// The carousel whose root contains `node`.
    pub fn carousel_containing(&self, doc: &Document, node: NodeId) -> Option<CarouselId> {
        self.carousels
            .iter()
            .find(|c| {
                let root = c.slots().root;
                node == root || doc.is_ancestor(root, node)
            })
            .map(|c| c.id())
    }

    pub fn modal(&self, key: &str) -> Option<&ModalSlots> {
        self.modals.iter().find(|(k, _)| k == key).map(|(_, m)| m)
    }

    /// Key and slots of the modal with element id `modal_id`.
    pub fn modal_by_id(&self, modal_id: &str) -> Option<(&str, &ModalSlots)> {
        let key = modal_id.strip_suffix("-modal")?;
        self.modals
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, m)| (k.as_str(), m))
    }

    /// Key of the modal whose root element is `node`.
    pub fn modal_with_root(&self, node: NodeId) -> Option<&str> {
        self.modals
            .iter()
            .find(|(_, m)| m.root == node)
            .map(|(k, _)| k.as_str())
    }

    pub fn modals(&self) -> impl Iterator<Item = (&str, &ModalSlots)> {
        self.modals.iter().map(|(k, m)| (k.as_str(), m))
    }
}
