//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the site directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Portfolio"
//!
//! [manifest]
//! endpoint = "portfolio-manifest.json"   # Path or http(s) URL
//! cache_bust_param = "t"                 # ?t=<unix millis> on every fetch
//!
//! [carousel]
//! interval_ms = 4000        # Auto-advance period
//! swipe_threshold = 50.0    # Minimum horizontal swipe distance (px)
//!
//! [status]
//! loading = "#ffc107"
//! success = "#28a745"
//! error = "#dc3545"
//! fallback = "#6c757d"
//!
//! [processing]
//! max_processes = 4         # Max parallel probe workers (omit for auto = CPU cores)
//!
//! [[categories]]
//! key = "embedded"
//! path = "Images&videos/Embedded Software Development"
//! title = "Embedded Software Development"
//! description = "..."
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Tables merge
//! key by key; arrays replace, so a `[[categories]]` list in the user file
//! replaces the stock category list entirely.
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page `<title>` of the built gallery.
    pub site_title: String,
    /// Where the manifest lives and how it is fetched.
    pub manifest: ManifestConfig,
    /// Carousel interaction settings.
    pub carousel: CarouselConfig,
    /// Status indicator colors.
    pub status: StatusPalette,
    /// Parallel probing settings.
    pub processing: ProcessingConfig,
    /// Categories in render order.
    pub categories: Vec<CategoryConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Portfolio".to_string(),
            manifest: ManifestConfig::default(),
            carousel: CarouselConfig::default(),
            status: StatusPalette::default(),
            processing: ProcessingConfig::default(),
            categories: catalog::default_categories()
                .map(|(key, path, title, description)| CategoryConfig {
                    key: key.to_string(),
                    path: path.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "manifest.endpoint must not be empty".into(),
            ));
        }
        if self.manifest.cache_bust_param.trim().is_empty() {
            return Err(ConfigError::Validation(
                "manifest.cache_bust_param must not be empty".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be greater than 0".into(),
            ));
        }
        let threshold = self.carousel.swipe_threshold;
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "carousel.swipe_threshold must be positive".into(),
            ));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "categories.key must not be empty".into(),
                ));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate category key: {}",
                    category.key
                )));
            }
        }
        Ok(())
    }

    pub fn category(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }
}

/// Manifest location and fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Relative path (resolved against the site directory) or http(s) URL.
    pub endpoint: String,
    /// Query parameter carrying the cache-busting timestamp.
    pub cache_bust_param: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            endpoint: "portfolio-manifest.json".to_string(),
            cache_bust_param: "t".to_string(),
        }
    }
}

impl ManifestConfig {
    /// File name shown in "check the manifest" hints.
    pub fn file_name(&self) -> &str {
        let path = self.endpoint.split(['?', '#']).next().unwrap_or(&self.endpoint);
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Carousel interaction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Auto-advance period in milliseconds.
    pub interval_ms: u64,
    /// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
    pub swipe_threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 4000,
            swipe_threshold: 50.0,
        }
    }
}

/// Background colors of the status indicator, one per status family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusPalette {
    pub loading: String,
    pub success: String,
    pub error: String,
    pub fallback: String,
}

impl Default for StatusPalette {
    fn default() -> Self {
        Self {
            loading: "#ffc107".to_string(),
            success: "#28a745".to_string(),
            error: "#dc3545".to_string(),
            fallback: "#6c757d".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel probe workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

/// One portfolio category: its key, media folder and display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Identifier used for `data-category` and the `<key>-modal` id.
    pub key: String,
    /// Media folder, relative to the site directory.
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site directory.
pub fn load_config(site: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(site)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-gallery configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Title of the generated page.
site_title = "Portfolio"

# ---------------------------------------------------------------------------
# Manifest
# ---------------------------------------------------------------------------
[manifest]
# Relative path (resolved against the site directory) or an http(s) URL.
endpoint = "portfolio-manifest.json"

# Query parameter carrying a timestamp so every fetch bypasses caches.
cache_bust_param = "t"

# ---------------------------------------------------------------------------
# Carousels
# ---------------------------------------------------------------------------
[carousel]
# Auto-advance period in milliseconds.
interval_ms = 4000

# Minimum horizontal travel (px) for a touch gesture to change slides.
swipe_threshold = 50.0

# ---------------------------------------------------------------------------
# Status indicator colors
# ---------------------------------------------------------------------------
[status]
loading = "#ffc107"
success = "#28a745"
error = "#dc3545"
fallback = "#6c757d"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers when probing media files.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Categories (render order). A list here replaces the whole default list.
# ---------------------------------------------------------------------------
[[categories]]
key = "embedded"
path = "Images&videos/Embedded Software Development"
title = "Embedded Software Development"
description = "Advanced firmware solutions for industrial applications and IoT devices, delivering robust and scalable embedded systems"

[[categories]]
key = "pcb"
path = "Images&videos/PCB designing"
title = "Professional PCB Design"
description = "High-complexity PCB solutions from concept to production, serving global industry leaders and cutting-edge applications"

[[categories]]
key = "gui"
path = "Images&videos/Graphical User Interface Software"
title = "Industrial GUI & HMI Solutions"
description = "Professional graphical user interface development for industrial applications"

[[categories]]
key = "testbox"
path = "Images&videos/Test box for systems simulation"
title = "Hardware-in-the-Loop Testing"
description = "Complete test automation systems for complex HVAC applications, enabling comprehensive validation and quality assurance"
"##
}
