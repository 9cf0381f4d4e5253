//! Shared manifest types.
//!
//! These types are the JSON shape of `portfolio-manifest.json`: produced by
//! [`scan`](crate::scan), consumed by the [`loader`](crate::loader) and the
//! renderers. The manifest is an *ordered* map: category order in the document
//! is the order categories are rendered in, so [`Manifest`] wraps an
//! [`IndexMap`] and serializes as a plain JSON object in that order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions that classify a media item as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Whether a media item renders as `<img>` or `<video>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One renderable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Path or URL of the asset, unique within its category.
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Caption shown under the item in the modal gallery.
    #[serde(default)]
    pub description: String,
}

impl MediaItem {
    pub fn new(src: impl Into<String>, alt: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            description: description.into(),
        }
    }

    /// Classify by the extension of the path part of `src`.
    ///
    /// Query strings and fragments are ignored, and the comparison is
    /// case-insensitive: `clip.MP4?v=2` is a video.
    pub fn kind(&self) -> MediaKind {
        let path = self
            .src
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.src);
        let ext = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }
}

/// A named grouping of media with its own carousel and modal gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<MediaItem>,
}

/// Ordered mapping of category key to [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, Category>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, category: Category) {
        self.entries.insert(key.into(), category);
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.get(key)
    }

    /// Categories in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total media items across all categories.
    pub fn item_count(&self) -> usize {
        self.entries.values().map(|c| c.images.len()).sum()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(String, Category)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, Category)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_extensions_classify_as_video() {
        for src in ["a.mp4", "dir/b.mov", "c.avi", "UPPER.MP4", "clip.mp4?t=1"] {
            assert_eq!(MediaItem::new(src, "", "").kind(), MediaKind::Video, "{src}");
        }
    }

    #[test]
    fn everything_else_is_an_image() {
        for src in ["a.png", "b.jpeg", "c.webp", "no-extension", "mp4.png", "video.mp4.jpg"] {
            assert_eq!(MediaItem::new(src, "", "").kind(), MediaKind::Image, "{src}");
        }
    }

    #[test]
    fn manifest_keeps_document_order() {
        let json = r#"{
            "pcb": {"title": "P", "description": "", "images": []},
            "embedded": {"title": "E", "description": "", "images": []},
            "gui": {"title": "G", "description": "", "images": []}
        }"#;
        let manifest = Manifest::from_json(json).unwrap();
        let keys: Vec<&str> = manifest.keys().collect();
        assert_eq!(keys, vec!["pcb", "embedded", "gui"]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let json = r#"{"gui": {"images": [{"src": "a.png"}]}}"#;
        let manifest = Manifest::from_json(json).unwrap();
        let gui = manifest.get("gui").unwrap();
        assert_eq!(gui.title, "");
        assert_eq!(gui.images[0].alt, "");
        assert_eq!(gui.images[0].description, "");
    }

    #[test]
    fn item_without_src_is_rejected() {
        let json = r#"{"gui": {"images": [{"alt": "nope"}]}}"#;
        assert!(Manifest::from_json(json).is_err());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut manifest = Manifest::new();
        let cat = |t: &str| Category {
            title: t.to_string(),
            description: String::new(),
            images: vec![],
        };
        manifest.insert("a", cat("first"));
        manifest.insert("b", cat("second"));
        manifest.insert("a", cat("replaced"));
        let titles: Vec<&str> = manifest.iter().map(|(_, c)| c.title.as_str()).collect();
        assert_eq!(titles, vec!["replaced", "second"]);
    }

    #[test]
    fn duplicate_keys_in_json_keep_first_position() {
        let json = r#"{
            "a": {"title": "first"},
            "b": {"title": "second"},
            "a": {"title": "replaced"}
        }"#;
        let manifest = Manifest::from_json(json).unwrap();
        let titles: Vec<&str> = manifest.iter().map(|(_, c)| c.title.as_str()).collect();
        assert_eq!(titles, vec!["replaced", "second"]);
    }

    #[test]
    fn serializes_as_object_in_order() {
        let manifest: Manifest = vec![
            ("z".to_string(), Category { title: "Z".into(), description: String::new(), images: vec![] }),
            ("a".to_string(), Category { title: "A".into(), description: String::new(), images: vec![] }),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.find("\"z\"").unwrap() < json.find("\"a\"").unwrap());
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }
}
