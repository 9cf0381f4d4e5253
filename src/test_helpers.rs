//! Shared test utilities for the folio-gallery test suite.
//!
//! Provides canned transports that record the URLs they were asked for,
//! manifest fixtures, and helpers for writing real media files into temp
//! directories.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (primary, urls) = StaticTransport::status("http", 404, "Not Found");
//! let (secondary, _) = StaticTransport::ok("agent", single_category_json());
//! let loader = ManifestLoader::new("m.json", "t", vec![Box::new(primary), Box::new(secondary)]);
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::loader::{FetchResponse, Transport, TransportError};
use crate::types::{Category, Manifest, MediaItem};

pub type UrlLog = Rc<RefCell<Vec<String>>>;

enum Reply {
    Response(FetchResponse),
    Network(String),
}

/// Transport that always gives the same reply and records requested URLs.
pub struct StaticTransport {
    name: String,
    reply: Reply,
    urls: UrlLog,
}

impl StaticTransport {
    fn build(name: &str, reply: Reply) -> (Self, UrlLog) {
        let urls = UrlLog::default();
        let transport = Self {
            name: name.to_string(),
            reply,
            urls: Rc::clone(&urls),
        };
        (transport, urls)
    }

    pub fn ok(name: &str, body: impl Into<String>) -> (Self, UrlLog) {
        Self::build(name, Reply::Response(FetchResponse::ok(body)))
    }

    pub fn status(name: &str, status: u16, status_text: &str) -> (Self, UrlLog) {
        Self::build(
            name,
            Reply::Response(FetchResponse {
                status,
                status_text: status_text.to_string(),
                body: String::new(),
            }),
        )
    }

    pub fn network_error(name: &str, message: &str) -> (Self, UrlLog) {
        Self::build(name, Reply::Network(message.to_string()))
    }
}

impl Transport for StaticTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.urls.borrow_mut().push(url.to_string());
        match &self.reply {
            Reply::Response(r) => Ok(r.clone()),
            Reply::Network(msg) => Err(TransportError::Network(msg.clone())),
        }
    }
}

// =========================================================================
// Manifest fixtures
// =========================================================================

/// `{"embedded": {"title": "T", "description": "D", "images": [a.png]}}`
pub fn single_category_json() -> &'static str {
    r#"{
  "embedded": {
    "title": "T",
    "description": "D",
    "images": [{"src": "a.png", "alt": "a", "description": "d"}]
  }
}"#
}

/// A category with `n` images named `img0.png`, `img1.png`, ...
pub fn images(n: usize) -> Vec<MediaItem> {
    (0..n)
        .map(|i| MediaItem::new(format!("img{i}.png"), format!("Image {i}"), format!("caption {i}")))
        .collect()
}

pub fn category(title: &str, items: Vec<MediaItem>) -> Category {
    Category {
        title: title.to_string(),
        description: format!("{title} description"),
        images: items,
    }
}

pub fn manifest_of(entries: &[(&str, Vec<MediaItem>)]) -> Manifest {
    entries
        .iter()
        .map(|(key, items)| (key.to_string(), category(key, items.clone())))
        .collect()
}

// =========================================================================
// Media files
// =========================================================================

/// Write a small but valid PNG at `path`, creating parent directories.
pub fn write_png(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::from_pixel(4, 3, image::Rgb([200, 40, 40]))
        .save(path)
        .unwrap();
}

/// Write a file whose content is not decodable media.
pub fn write_junk(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"definitely not media").unwrap();
}
