// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object key sanitizing and content type lookup.

/// Rewrite `key` so it is safe to use as a relative path below the media root.
///
/// Each `/`-separated segment keeps only `[A-Za-z0-9._-]`; anything else
/// becomes `_`. Empty segments are dropped and segments made only of dots
/// are replaced, so the result never escapes the root. Returns `None` when
/// nothing usable is left.
pub fn sanitize_key(key: &str) -> Option<String> {
    let segments: Vec<String> = key
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let cleaned: String = segment
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            if cleaned.chars().all(|c| c == '.') {
                "_".repeat(cleaned.len())
            } else {
                cleaned
            }
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Fallback type for objects that are not served inline.
pub const OPAQUE_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type served for a key, derived from its extension.
///
/// Only raster image types are served inline. Everything else, scriptable
/// formats such as SVG included, is `application/octet-stream`.
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => OPAQUE_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keeps_folder_structure() {
        assert_eq!(
            sanitize_key("products/0192_my photo.JPG").as_deref(),
            Some("products/0192_my_photo.JPG")
        );
        assert_eq!(sanitize_key("avatars//a.png").as_deref(), Some("avatars/a.png"));
    }

    #[test]
    fn traversal_is_neutralized() {
        assert_eq!(sanitize_key("../../etc/passwd").as_deref(), Some("__/__/etc/passwd"));
        assert_eq!(sanitize_key("a\\..\\b").as_deref(), Some("a/__/b"));
        assert_eq!(sanitize_key("///"), None);
        assert_eq!(sanitize_key(""), None);
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("products/x.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("avatars/a.png"), "image/png");
        assert_eq!(content_type_for("noext"), OPAQUE_CONTENT_TYPE);
        assert_eq!(content_type_for("products/x.svg"), OPAQUE_CONTENT_TYPE);
        assert_eq!(content_type_for("avatars/page.HTML"), OPAQUE_CONTENT_TYPE);
    }

    proptest! {
        #[test]
        fn sanitized_keys_stay_below_root(key in ".{0,64}") {
            if let Some(clean) = sanitize_key(&key) {
                prop_assert!(!clean.starts_with('/'));
                for segment in clean.split('/') {
                    prop_assert!(!segment.is_empty());
                    prop_assert!(segment != "." && segment != "..");
                    prop_assert!(segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
                }
            }
        }
    }
}
