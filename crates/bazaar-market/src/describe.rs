// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI-assisted listing descriptions.
//!
//! Prompt wording and parsing of the model's answer live here; transport is
//! the [`DescriptionAdapter`]'s job.

use bazaar_core::BazaarError;
use bazaar_core::traits::DescriptionAdapter;
use bazaar_core::types::GeneratedListing;
use bazaar_prometheus::record_ai_generation;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ImageUpload, Marketplace};

fn description_prompt(name: &str, keywords: &str) -> String {
    let keywords = if keywords.trim().is_empty() {
        "(none)"
    } else {
        keywords.trim()
    };
    format!(
        "You are a copywriter for a second-hand marketplace.\n\
         Write a sales description for the product below.\n\
         - At most 200 characters.\n\
         - Polite, friendly register.\n\
         - Output only the description, with no preamble or headings.\n\n\
         Product name: {name}\n\
         Keywords: {keywords}"
    )
}

const IMAGE_PROMPT: &str = "You are helping a seller list an item on a second-hand marketplace.\n\
Look at the photo and answer with a single JSON object and nothing else:\n\
{\"name\": string, \"price\": integer, \"keywords\": string, \"description\": string}\n\
- name: a short product name.\n\
- price: a realistic second-hand price as a whole number.\n\
- keywords: comma-separated search keywords.\n\
- description: at most 200 characters, polite register.";

impl Marketplace {
    /// Write a listing description from a name and keywords.
    pub async fn generate_description(
        &self,
        name: &str,
        keywords: &str,
    ) -> Result<String, BazaarError> {
        let describer = self.describer()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BazaarError::BadRequest("name is required".into()));
        }

        let text = describer
            .generate_text(&description_prompt(name, keywords))
            .await?;
        record_ai_generation("text");
        Ok(text.trim().to_string())
    }

    /// Suggest listing fields from a product photo.
    pub async fn generate_from_image(
        &self,
        image: ImageUpload,
    ) -> Result<GeneratedListing, BazaarError> {
        let describer = self.describer()?;
        if image.bytes.is_empty() {
            return Err(BazaarError::BadRequest("image is required".into()));
        }

        let raw = describer
            .generate_from_image(IMAGE_PROMPT, &image.bytes, image.mime_type())
            .await?;
        let generated = parse_generated(&raw).inspect_err(|e| {
            warn!(error = %e, "unparseable model output");
        })?;
        record_ai_generation("image");
        debug!(name = %generated.name, price = generated.price, "listing suggested from image");
        Ok(generated)
    }

    fn describer(&self) -> Result<&(dyn DescriptionAdapter + Send + Sync), BazaarError> {
        self.describer
            .as_deref()
            .ok_or_else(|| BazaarError::Unavailable("description generation is not configured".into()))
    }
}

/// Drop a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the model's JSON answer into listing fields.
pub fn parse_generated(raw: &str) -> Result<GeneratedListing, BazaarError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw)).map_err(|e| {
        BazaarError::Provider {
            message: format!("model output is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        }
    })?;
    let Value::Object(fields) = value else {
        return Err(BazaarError::provider("model output is not a JSON object"));
    };

    let text = |key: &str| match fields.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(GeneratedListing {
        name: text("name"),
        price: fields.get("price").map(parse_price).unwrap_or(0),
        keywords: text("keywords"),
        description: text("description"),
    })
}

/// Read a price given as a number or as text such as `"¥1,200"`.
///
/// Text keeps its leading digits once separators and a currency prefix are
/// removed. Anything unreadable is 0.
pub fn parse_price(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0)
            .max(0),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|&c| !matches!(c, ',' | '_' | ' '))
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn parses_fenced_object() {
        let raw = "```json\n{\"name\": \"Desk lamp\", \"price\": \"¥1,200\", \"keywords\": \"lamp, desk\", \"description\": \"Works well.\"}\n```";
        let generated = parse_generated(raw).unwrap();
        assert_eq!(
            generated,
            GeneratedListing {
                name: "Desk lamp".into(),
                price: 1200,
                keywords: "lamp, desk".into(),
                description: "Works well.".into(),
            }
        );
    }

    #[test]
    fn keyword_arrays_are_joined() {
        let generated =
            parse_generated(r#"{"name":"Mug","price":300,"keywords":["cup","ceramic"]}"#).unwrap();
        assert_eq!(generated.keywords, "cup, ceramic");
        assert_eq!(generated.description, "");
    }

    #[test]
    fn non_json_is_a_provider_error() {
        let err = parse_generated("I think this is a lamp.").unwrap_err();
        assert!(matches!(err, BazaarError::Provider { .. }));
        let err = parse_generated("[1, 2]").unwrap_err();
        assert!(matches!(err, BazaarError::Provider { .. }));
    }

    #[test]
    fn prices_from_numbers_and_text() {
        assert_eq!(parse_price(&json!(1500)), 1500);
        assert_eq!(parse_price(&json!(1499.9)), 1499);
        assert_eq!(parse_price(&json!(-20)), 0);
        assert_eq!(parse_price(&json!("2,500")), 2500);
        assert_eq!(parse_price(&json!("$ 40 USD")), 40);
        assert_eq!(parse_price(&json!("3000円")), 3000);
        assert_eq!(parse_price(&json!("about a dollar")), 0);
        assert_eq!(parse_price(&json!(null)), 0);
    }

    #[test]
    fn prompt_mentions_name_and_keywords() {
        let prompt = description_prompt("Desk lamp", " vintage ");
        assert!(prompt.contains("Product name: Desk lamp"));
        assert!(prompt.contains("Keywords: vintage"));
        assert!(description_prompt("Lamp", "").contains("Keywords: (none)"));
    }

    proptest! {
        #[test]
        fn parsed_prices_are_never_negative(s in ".{0,40}") {
            prop_assert!(parse_price(&Value::String(s)) >= 0);
        }

        #[test]
        fn integer_strings_round_trip(n in 0i64..1_000_000_000) {
            prop_assert_eq!(parse_price(&Value::String(n.to_string())), n);
        }
    }
}
