//! Manifest generation from the media folders on disk.
//!
//! Walks each configured category folder (one level deep) and produces the
//! `portfolio-manifest.json` the loader fetches.
//!
//! ## Directory Structure
//!
//! ```text
//! site/
//! ├── config.toml                           # Optional; lists the categories
//! ├── portfolio-manifest.json               # Written by `scan`
//! └── Images&videos/
//!     ├── PCB designing/
//!     │   ├── 010-Control board.png         # Numbered files sort first
//!     │   ├── 010-Control board.txt         # Caption sidecar (optional)
//!     │   └── Board design.mp4
//!     └── Graphical User Interface Software/
//!         └── PyQT5 application.png
//! ```
//!
//! ## Per-file fields
//!
//! - `src`: `<category path>/<file name>`, forward slashes
//! - `alt`: file name without prefix or extension, words capitalized
//! - `description`: sidecar → curated caption → file name
//!
//! A configured folder that does not exist yields an empty category and a
//! warning, never an error.

use crate::config::SiteConfig;
use crate::metadata;
use crate::naming;
use crate::types::{Category, Manifest, MediaItem};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions picked up by the scan.
pub const MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "mp4", "mov", "avi"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a scan: the manifest plus what could not be found.
#[derive(Debug)]
pub struct ScanReport {
    pub manifest: Manifest,
    /// Configured category paths that do not exist.
    pub missing_folders: Vec<String>,
}

pub fn scan(site: &Path, config: &SiteConfig) -> Result<ScanReport, ScanError> {
    let mut manifest = Manifest::new();
    let mut missing_folders = Vec::new();

    for cat in &config.categories {
        let folder = web_path(&cat.path);
        let dir = site.join(&folder);
        let images = if dir.is_dir() {
            scan_folder(&dir, &folder)?
        } else {
            tracing::warn!(key = %cat.key, folder = %folder, "category folder does not exist");
            missing_folders.push(folder.clone());
            Vec::new()
        };
        tracing::debug!(key = %cat.key, count = images.len(), "scanned category");
        manifest.insert(
            cat.key.clone(),
            Category {
                title: cat.title.clone(),
                description: cat.description.clone(),
                images,
            },
        );
    }

    Ok(ScanReport {
        manifest,
        missing_folders,
    })
}

/// Forward slashes, no trailing separator.
fn web_path(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

fn is_media(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    MEDIA_EXTENSIONS.contains(&ext.as_str())
}

fn scan_folder(dir: &Path, folder: &str) -> Result<Vec<MediaItem>, ScanError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && !name.starts_with('.') && is_media(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort_by_key(|p| naming::sort_key(&p.file_name().unwrap_or_default().to_string_lossy()));

    Ok(files
        .iter()
        .map(|path| {
            let filename = path.file_name().unwrap_or_default().to_string_lossy().to_string();
            MediaItem::new(
                format!("{folder}/{filename}"),
                naming::alt_text(&filename),
                metadata::describe(path),
            )
        })
        .collect())
}

/// Write `manifest` as pretty JSON, creating parent directories.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ScanError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, manifest.to_json_pretty()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn config_for(categories: &[(&str, &str)]) -> SiteConfig {
        SiteConfig {
            categories: categories
                .iter()
                .map(|(key, path)| CategoryConfig {
                    key: key.to_string(),
                    path: path.to_string(),
                    title: key.to_uppercase(),
                    description: format!("{key} work"),
                })
                .collect(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn scan_picks_media_in_prefix_order() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("media/pcb");
        write_png(&dir.join("zeta.png"));
        write_png(&dir.join("020-second.png"));
        write_png(&dir.join("001-first.jpg"));
        write_junk(&dir.join("clip.MP4"));
        write_junk(&dir.join("notes.md"));
        write_junk(&dir.join(".hidden.png"));

        let report = scan(tmp.path(), &config_for(&[("pcb", "media/pcb/")])).unwrap();
        let srcs: Vec<&str> = report.manifest.get("pcb").unwrap().images.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(
            srcs,
            vec![
                "media/pcb/001-first.jpg",
                "media/pcb/020-second.png",
                "media/pcb/clip.MP4",
                "media/pcb/zeta.png",
            ]
        );
    }

    #[test]
    fn scan_derives_alt_and_description() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("m");
        write_png(&dir.join("010-board_bring-up.png"));
        fs::write(dir.join("010-board_bring-up.txt"), "First power-on").unwrap();
        write_png(&dir.join("dsPIC33 of Motor Control drivers.png"));

        let report = scan(tmp.path(), &config_for(&[("k", "m")])).unwrap();
        let images = &report.manifest.get("k").unwrap().images;
        assert_eq!(images[0].alt, "Board Bring Up");
        assert_eq!(images[0].description, "First power-on");
        assert_eq!(images[1].description, "dsPIC33 Motor Control drivers for high-performance applications");
    }

    #[test]
    fn scan_does_not_descend() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("m/nested/deep.png"));
        let report = scan(tmp.path(), &config_for(&[("k", "m")])).unwrap();
        assert!(report.manifest.get("k").unwrap().images.is_empty());
    }

    #[test]
    fn missing_folder_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let report = scan(tmp.path(), &config_for(&[("k", "nowhere")])).unwrap();
        assert!(report.manifest.get("k").unwrap().images.is_empty());
        assert_eq!(report.missing_folders, vec!["nowhere"]);
    }

    #[test]
    fn categories_keep_config_order_and_text() {
        let tmp = TempDir::new().unwrap();
        let report = scan(tmp.path(), &config_for(&[("b", "b"), ("a", "a")])).unwrap();
        let keys: Vec<&str> = report.manifest.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(report.manifest.get("a").unwrap().title, "A");
        assert_eq!(report.manifest.get("a").unwrap().description, "a work");
    }

    #[test]
    fn written_manifest_loads_back() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("m/a.png"));
        let report = scan(tmp.path(), &config_for(&[("k", "m")])).unwrap();
        let path = tmp.path().join("out/portfolio-manifest.json");
        write_manifest(&report.manifest, &path).unwrap();
        let loaded = Manifest::from_json(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, report.manifest);
    }
}
