// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Filename classification and heuristic alt derivation
//!
//! Pure functions: no I/O, no failure modes. Used to gate which records
//! enter the pipeline and to produce alt text for formats the vision
//! backends cannot consume (svg).

/// Extensions accepted by the pipeline
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "bmp", "tiff", "tif", "svg",
];

/// Lowercased final extension of a filename, if any
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Lowercased extension of a URL path, query string stripped
pub fn extension_of_url_path(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    extension_of(path)
}

/// True iff the filename carries a supported image extension
pub fn is_supported_image(filename: &str) -> bool {
    match extension_of(filename) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Content type for a supported extension (direct storage reads)
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Derive a human-readable alt text from a filename alone.
///
/// Strips path and extension, splits hyphen/underscore/camelCase boundaries,
/// lowercases and collapses whitespace. Appends "icon" or "logo" when the
/// raw name matches the pattern but the cleaned text lacks the word.
pub fn derive_alt_from_filename(filename: &str) -> String {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    let name_without_ext = match basename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => basename,
    };

    let mut spaced = String::with_capacity(name_without_ext.len() + 8);
    let mut prev: Option<char> = None;
    for c in name_without_ext.chars() {
        match c {
            '-' | '_' => spaced.push(' '),
            _ => {
                if let Some(p) = prev {
                    if p.is_lowercase() && c.is_uppercase() {
                        spaced.push(' ');
                    }
                }
                spaced.push(c);
            }
        }
        prev = Some(c);
    }

    let cleaned = spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let raw_lower = name_without_ext.to_lowercase();
    let is_icon = raw_lower.contains("icon") || raw_lower.ends_with("ico");
    let is_logo = raw_lower.contains("logo");

    if is_icon && !cleaned.contains("icon") {
        return format!("{} icon", cleaned);
    }
    if is_logo && !cleaned.contains("logo") {
        return format!("{} logo", cleaned);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_case_insensitive() {
        for ext in IMAGE_EXTENSIONS {
            assert!(is_supported_image(&format!("photo.{}", ext)));
            assert!(is_supported_image(&format!("photo.{}", ext.to_uppercase())));
        }
    }

    #[test]
    fn test_unsupported_extensions() {
        assert!(!is_supported_image("document.pdf"));
        assert!(!is_supported_image("video.mp4"));
        assert!(!is_supported_image("archive.zip"));
        assert!(!is_supported_image("noextension"));
        assert!(!is_supported_image(""));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(extension_of("a/b/photo.png"), Some("png".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of(".hidden"), None);
    }

    #[test]
    fn test_extension_of_url_path_strips_query() {
        assert_eq!(
            extension_of_url_path("/media/photo.PNG?width=400&v=2"),
            Some("png".to_string())
        );
        assert_eq!(
            extension_of_url_path("https://cdn.example.com/img/cat.webp"),
            Some("webp".to_string())
        );
        assert_eq!(extension_of_url_path("/media/readme?x=1"), None);
    }

    #[test]
    fn test_derive_alt_hyphen_and_underscore() {
        assert_eq!(derive_alt_from_filename("beach-sunset.jpg"), "beach sunset");
        assert_eq!(derive_alt_from_filename("red_car_front.png"), "red car front");
    }

    #[test]
    fn test_derive_alt_camel_case() {
        assert_eq!(derive_alt_from_filename("beachSunset.jpg"), "beach sunset");
    }

    #[test]
    fn test_derive_alt_strips_path() {
        assert_eq!(
            derive_alt_from_filename("uploads/2024/beach-sunset.jpg"),
            "beach sunset"
        );
    }

    #[test]
    fn test_derive_alt_appends_logo() {
        let alt = derive_alt_from_filename("Company-Logo.svg");
        assert!(alt.contains("logo"));
        assert_eq!(alt, "company logo");
    }

    #[test]
    fn test_derive_alt_appends_icon() {
        let alt = derive_alt_from_filename("settings_icon.svg");
        assert!(alt.contains("icon"));
        assert_eq!(alt, "settings icon");
    }

    #[test]
    fn test_derive_alt_no_duplicate_suffix() {
        // "icon" already present in the cleaned text, nothing appended
        assert_eq!(derive_alt_from_filename("icon-search.svg"), "icon search");
        assert_eq!(derive_alt_from_filename("logo.svg"), "logo");
    }

    #[test]
    fn test_derive_alt_ico_suffix_counts_as_icon() {
        assert_eq!(derive_alt_from_filename("favico.svg"), "favico icon");
    }

    #[test]
    fn test_derive_alt_collapses_whitespace() {
        assert_eq!(derive_alt_from_filename("a__b--c.png"), "a b c");
    }

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(content_type_for_extension("svg"), Some("image/svg+xml"));
        assert_eq!(content_type_for_extension("exe"), None);
    }
}
