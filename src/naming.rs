//! Filename conventions for media files.
//!
//! Media discovered on disk follows the same optional `NNN-name` prefix
//! convention as the rest of the site: a numeric prefix controls ordering and
//! is dropped from display text.
//!
//! ## Display Text
//!
//! - `010-Board-bring-up.png` → alt `Board Bring Up`
//! - `PyQT5 application for test box machine simulator.png` → alt
//!   `PyQT5 Application For Test Box Machine Simulator`
//! - `my_capture.mp4` → alt `My Capture`
//!
//! Only the first letter of each word is touched, so acronyms such as `STM32`
//! and `PCB` survive.

/// Result of parsing a media filename like `010-Board-bring-up.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `10` from `010-Board-bring-up.png`)
    pub number: Option<u32>,
    /// Stem with the number prefix removed. Empty if number-only.
    pub name: String,
    /// Lowercased extension without the dot; empty when there is none.
    pub extension: String,
}

/// Parse a media filename following the optional `NNN-name.ext` convention.
///
/// - `"010-Board.png"` → number=Some(10), name="Board", extension="png"
/// - `"001.jpg"` → number=Some(1), name="", extension="jpg"
/// - `"3D model for the case.png"` → number=None, name="3D model for the case"
/// - `"GUI worldwide..png"` → name="GUI worldwide." (only the last dot splits)
pub fn parse_media_name(filename: &str) -> ParsedName {
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext.to_lowercase()),
        _ => (filename, String::new()),
    };

    if let Some((prefix, rest)) = stem.split_once('-')
        && !prefix.is_empty()
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: rest.to_string(),
            extension,
        };
    }
    if let Ok(num) = stem.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            extension,
        };
    }
    ParsedName {
        number: None,
        name: stem.to_string(),
        extension,
    }
}

/// Replace word separators (`_`, `-`, `.`) with spaces and collapse runs.
pub fn spaced(name: &str) -> String {
    name.split(['_', '-', '.', ' '])
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Alt text for a media filename: prefix and extension dropped, separators
/// turned into spaces, first letter of each word uppercased.
pub fn alt_text(filename: &str) -> String {
    let parsed = parse_media_name(filename);
    spaced(&parsed.name)
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sort key placing numbered files first (by number), then the rest by name.
pub fn sort_key(filename: &str) -> (u32, String) {
    let parsed = parse_media_name(filename);
    (parsed.number.unwrap_or(u32::MAX), filename.to_string())
}
