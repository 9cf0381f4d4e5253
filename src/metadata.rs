//! Caption resolution for discovered media.
//!
//! A media item's `description` (its caption in the modal gallery) can come
//! from three places. Each is tried in order and the first non-empty value wins:
//!
//! 1. **Sidecar file**: `board.txt` next to `board.png`. The user created it on
//!    purpose, so it overrides everything else.
//! 2. **Curated caption**: the compiled-in catalog's hand-written caption for a
//!    known filename.
//! 3. **Filename**: the stem with its number prefix dropped and separators
//!    turned into spaces.

use crate::catalog;
use crate::naming;
use std::path::Path;

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Read a sidecar `.txt` file for a media file.
///
/// Returns `None` if the file doesn't exist or is empty.
pub fn read_sidecar(media_path: &Path) -> Option<String> {
    let sidecar = media_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Caption for a media file on disk: sidecar → curated → filename.
pub fn describe(media_path: &Path) -> String {
    let filename = media_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    describe_with_sidecar(&filename, read_sidecar(media_path).as_deref())
}

/// Caption for a filename with an already-read sidecar.
pub fn describe_with_sidecar(filename: &str, sidecar: Option<&str>) -> String {
    let parsed = naming::parse_media_name(filename);
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    let from_name = naming::spaced(&parsed.name);
    resolve(&[sidecar, catalog::curated_caption(stem), Some(&from_name)]).unwrap_or_default()
}
