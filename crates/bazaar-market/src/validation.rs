// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request field validation.
//!
//! Every check returns [`BazaarError::BadRequest`] naming the offending field.

use bazaar_core::BazaarError;

pub const MAX_DISPLAY_NAME_CHARS: usize = 50;
pub const MAX_BIO_CHARS: usize = 500;
pub const MAX_LISTING_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_MESSAGE_CHARS: usize = 1000;

fn bounded(field: &str, value: &str, max_chars: usize) -> Result<String, BazaarError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BazaarError::BadRequest(format!("{field} is required")));
    }
    if value.chars().count() > max_chars {
        return Err(BazaarError::BadRequest(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trimmed display name, 1..=50 characters.
pub fn display_name(value: &str) -> Result<String, BazaarError> {
    bounded("name", value, MAX_DISPLAY_NAME_CHARS)
}

/// Trimmed bio; blank means no bio.
pub fn bio(value: Option<&str>) -> Result<Option<String>, BazaarError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > MAX_BIO_CHARS => Err(BazaarError::BadRequest(format!(
            "bio must be at most {MAX_BIO_CHARS} characters"
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validated listing fields: trimmed name, non-negative price, bounded description.
pub fn listing_fields(
    name: &str,
    price: i64,
    description: &str,
) -> Result<(String, i64, String), BazaarError> {
    let name = bounded("name", name, MAX_LISTING_NAME_CHARS)?;
    if price < 0 {
        return Err(BazaarError::BadRequest("price must not be negative".into()));
    }
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(BazaarError::BadRequest(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok((name, price, description.to_string()))
}

/// Parse a form price value.
pub fn price(value: &str) -> Result<i64, BazaarError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| BazaarError::BadRequest("price must be an integer".into()))
}

pub fn message_content(value: &str) -> Result<String, BazaarError> {
    bounded("content", value, MAX_MESSAGE_CHARS)
}

/// A required identifier parameter.
pub fn required_id(field: &str, value: &str) -> Result<String, BazaarError> {
    let value = value.trim();
    if value.is_empty() {
        Err(BazaarError::BadRequest(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

/// Reduce an uploaded file name to `[A-Za-z0-9._-]`, keeping the extension.
///
/// Directory components are dropped. An empty result becomes `image`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}
