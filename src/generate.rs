//! Static site generation.
//!
//! Builds the host page for the configured categories, runs a [`Gallery`]
//! session over it (manifest load, carousel and modal rendering) and writes
//! the result as a single page. Media referenced by the manifest is copied
//! alongside it so the page works when served from the output directory.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                       # Carousels, modals, inlined CSS/JS
//! └── Images&videos/
//!     ├── Embedded Software Development/
//!     │   └── STM32 Dehumidifiers.png  # Copied from the site directory
//!     └── ...
//! ```
//!
//! Remote `src` values (`http://`, `https://`) are left alone. Local paths
//! that would leave the site directory, and files that do not exist, are
//! counted as missing; the page still references them and the browser shows
//! the broken-media treatment.

use crate::config::SiteConfig;
use crate::gallery::Gallery;
use crate::loader::{ManifestLoader, ManifestSource};
use crate::page;
use crate::probe;
use crate::types::Manifest;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to copy {src}: {source}")]
    Copy {
        src: String,
        source: std::io::Error,
    },
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub source: ManifestSource,
    pub endpoint: String,
    /// `(title, slide count)` for each rendered category, in page order.
    pub categories: Vec<(String, usize)>,
    /// Path of the written page.
    pub page: PathBuf,
    pub copied: usize,
    pub missing: usize,
}

pub fn generate(
    site: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    loader: ManifestLoader,
) -> Result<BuildSummary, BuildError> {
    let endpoint = loader.endpoint().to_string();
    let mut gallery = Gallery::with_host(config, loader);
    gallery.start();

    let manifest = gallery.manifest().cloned().unwrap_or_default();
    let source = gallery
        .source()
        .cloned()
        .unwrap_or(ManifestSource::Fallback);

    let categories = config
        .categories
        .iter()
        .map(|c| {
            let slides = gallery.carousel(&c.key).map(|k| k.slide_count()).unwrap_or(0);
            (c.title.clone(), slides)
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    let html = page::render_page(&config.site_title, &config.carousel, gallery.document());
    let page_path = output_dir.join("index.html");
    fs::write(&page_path, html.into_string())?;
    tracing::info!(path = %page_path.display(), "wrote page");

    let (copied, missing) = copy_media(&manifest, site, output_dir)?;

    Ok(BuildSummary {
        source,
        endpoint,
        categories,
        page: page_path,
        copied,
        missing,
    })
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Local media paths referenced by `manifest`, first occurrence wins.
fn local_sources(manifest: &Manifest) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    manifest
        .iter()
        .flat_map(|(_, category)| category.images.iter())
        .map(|item| item.src.as_str())
        .filter(|src| !is_remote(src) && seen.insert(*src))
        .collect()
}

/// Copy every existing local media file. Returns `(copied, missing)`.
fn copy_media(manifest: &Manifest, site: &Path, output_dir: &Path) -> Result<(usize, usize), BuildError> {
    let results: Vec<Result<bool, BuildError>> = local_sources(manifest)
        .into_par_iter()
        .map(|src| {
            let Some(relative) = probe::site_relative(src) else {
                return Ok(false);
            };
            let from = site.join(&relative);
            if !from.is_file() {
                tracing::warn!(src, "referenced media not found");
                return Ok(false);
            }
            let to = output_dir.join(&relative);
            let copy = || -> std::io::Result<()> {
                if let Some(parent) = to.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&from, &to)?;
                Ok(())
            };
            copy().map_err(|source| BuildError::Copy {
                src: src.to_string(),
                source,
            })?;
            Ok(true)
        })
        .collect();

    let mut copied = 0;
    let mut missing = 0;
    for result in results {
        if result? {
            copied += 1;
        } else {
            missing += 1;
        }
    }
    Ok((copied, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::loader::FileTransport;
    use crate::test_helpers::*;
    use crate::types::{Category, MediaItem};
    use tempfile::TempDir;

    fn one_category_config() -> SiteConfig {
        SiteConfig {
            site_title: "Test Portfolio".into(),
            categories: vec![CategoryConfig {
                key: "pcb".into(),
                path: "media/pcb".into(),
                title: "PCB".into(),
                description: "Boards".into(),
            }],
            ..SiteConfig::default()
        }
    }

    fn file_loader(site: &Path) -> ManifestLoader {
        ManifestLoader::new(
            "portfolio-manifest.json",
            "t",
            vec![Box::new(FileTransport::new(site))],
        )
    }

    fn write_site_manifest(site: &Path, manifest: &Manifest) {
        fs::write(
            site.join("portfolio-manifest.json"),
            manifest.to_json_pretty().unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn builds_page_and_copies_existing_media() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_png(&site.path().join("media/pcb/a.png"));
        let mut manifest = Manifest::new();
        manifest.insert(
            "pcb",
            Category {
                title: "PCB".into(),
                description: "Boards".into(),
                images: vec![
                    MediaItem::new("media/pcb/a.png", "A", "first"),
                    MediaItem::new("media/pcb/gone.png", "Gone", "second"),
                    MediaItem::new("https://cdn.example/x.png", "X", "remote"),
                ],
            },
        );
        write_site_manifest(site.path(), &manifest);

        let summary = generate(site.path(), out.path(), &one_category_config(), file_loader(site.path())).unwrap();

        assert_eq!(summary.source, ManifestSource::Transport("file".into()));
        assert_eq!(summary.categories, vec![("PCB".to_string(), 3)]);
        assert_eq!(summary.copied, 1);
        assert_eq!(summary.missing, 1);
        assert!(out.path().join("media/pcb/a.png").is_file());

        let html = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Portfolio</title>"));
        assert!(html.contains(r#"src="media/pcb/a.png""#));
        assert!(html.contains("carousel-image active"));
        assert!(html.contains(r#"data-swipe-threshold="50""#));
        assert!(html.contains(r#"data-on-error="slide""#));
        assert!(html.contains(r#"data-on-error="modal""#));
    }

    #[test]
    fn missing_manifest_builds_from_fallback() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let summary = generate(site.path(), out.path(), &SiteConfig::default(), file_loader(site.path())).unwrap();
        assert_eq!(summary.source, ManifestSource::Fallback);
        assert_eq!(summary.copied, 0);
        assert!(summary.missing > 0);
        assert!(summary.categories.iter().all(|(_, n)| *n > 0));
    }

    #[test]
    fn sources_outside_the_site_are_not_copied() {
        let root = TempDir::new().unwrap();
        let site = root.path().join("a/site");
        let out = root.path().join("a/out");
        fs::create_dir_all(&site).unwrap();
        fs::write(root.path().join("secret.txt"), "private").unwrap();
        fs::write(root.path().join("a/secret.txt"), "private").unwrap();

        let manifest = manifest_of(&[(
            "k",
            vec![
                MediaItem::new("../../secret.txt", "", ""),
                MediaItem::new("../secret.txt", "", ""),
            ],
        )]);
        let (copied, missing) = copy_media(&manifest, &site, &out).unwrap();

        assert_eq!((copied, missing), (0, 2));
        assert!(!out.exists());
        assert_eq!(fs::read_to_string(root.path().join("secret.txt")).unwrap(), "private");
    }

    #[test]
    fn duplicate_sources_copied_once() {
        let manifest = manifest_of(&[("a", images(2)), ("b", images(3))]);
        let sources = local_sources(&manifest);
        assert_eq!(sources, vec!["img0.png", "img1.png", "img2.png"]);
    }
}
