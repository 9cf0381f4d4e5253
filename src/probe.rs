//! Media existence probing.
//!
//! Decides whether a candidate media path resolves to something loadable,
//! without ever failing: a missing, unreadable or undecodable file is simply
//! `false`. [`ImageProber`] decodes the image header the way a browser's image
//! load would succeed or fail; videos never decode as images and so never
//! pass it. [`FileProber`] only checks that a file is there.
//!
//! Probing runs in parallel on the global rayon pool (sized from
//! `[processing] max_processes`), but results always keep candidate order.

use crate::catalog;
use crate::config::SiteConfig;
use crate::metadata;
use crate::naming;
use crate::types::{Category, Manifest, MediaItem};
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};

pub trait Prober: Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Passes only files whose image header decodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProber;

impl Prober for ImageProber {
    fn exists(&self, path: &Path) -> bool {
        match image::image_dimensions(path) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "probe miss");
                false
            }
        }
    }
}

/// Passes any regular file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProber;

impl Prober for FileProber {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Site-relative path of a manifest `src`, query and fragment dropped.
///
/// `None` when the path would leave the site directory: any `..`, root or
/// drive prefix after the leading `/` is trimmed.
pub fn site_relative(src: &str) -> Option<PathBuf> {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let relative = Path::new(path.trim_start_matches('/'));
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained || relative.as_os_str().is_empty() {
        tracing::warn!(src, "media path leaves the site directory");
        return None;
    }
    Some(relative.to_path_buf())
}

fn local_path(site: &Path, src: &str) -> Option<PathBuf> {
    site_relative(src).map(|relative| site.join(relative))
}

/// Keep the items whose `src` resolves under `site`, in their original order.
pub fn filter_existing(prober: &dyn Prober, site: &Path, items: &[MediaItem]) -> Vec<MediaItem> {
    items
        .par_iter()
        .filter(|item| local_path(site, &item.src).is_some_and(|path| prober.exists(&path)))
        .cloned()
        .collect()
}

/// Probe `candidates` (file names) inside `folder`; returns the ones found as
/// `folder/name` sources, in candidate order.
pub fn scan_folder(prober: &dyn Prober, site: &Path, folder: &str, candidates: &[&str]) -> Vec<String> {
    candidates
        .par_iter()
        .map(|name| format!("{folder}/{name}"))
        .filter(|src| prober.exists(&site.join(src)))
        .collect()
}

/// Whether a manifest item resolves: remote sources are not probed, videos
/// need only exist, images must decode.
pub fn resolves(site: &Path, item: &MediaItem) -> bool {
    if is_remote(&item.src) {
        return true;
    }
    let Some(path) = local_path(site, &item.src) else {
        return false;
    };
    if item.is_video() {
        FileProber.exists(&path)
    } else {
        ImageProber.exists(&path)
    }
}

/// Items of a manifest that do not resolve, as `(category key, item)`.
pub fn unresolved(site: &Path, manifest: &Manifest) -> Vec<(String, MediaItem)> {
    let all: Vec<(&str, &MediaItem)> = manifest
        .iter()
        .flat_map(|(key, category)| category.images.iter().map(move |item| (key, item)))
        .collect();
    all.par_iter()
        .filter(|(_, item)| !resolves(site, item))
        .map(|(key, item)| (key.to_string(), (*item).clone()))
        .collect()
}

/// Build a manifest without one, by probing the catalog's well-known file
/// names in every configured category folder.
pub fn discover(prober: &dyn Prober, site: &Path, config: &SiteConfig) -> Manifest {
    let candidates = catalog::well_known_filenames();
    config
        .categories
        .iter()
        .map(|cat| {
            let images = scan_folder(prober, site, &cat.path, &candidates)
                .into_iter()
                .map(|src| {
                    let filename = src.rsplit('/').next().unwrap_or(&src).to_string();
                    let description = metadata::describe(&site.join(&src));
                    MediaItem::new(src, naming::alt_text(&filename), description)
                })
                .collect();
            (
                cat.key.clone(),
                Category {
                    title: cat.title.clone(),
                    description: cat.description.clone(),
                    images,
                },
            )
        })
        .collect()
}
