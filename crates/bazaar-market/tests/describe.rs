// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bazaar_core::BazaarError;
use bazaar_market::ImageUpload;
use bazaar_test_utils::TestHarness;

fn photo() -> ImageUpload {
    ImageUpload {
        file_name: "photo.png".into(),
        content_type: Some("image/png".into()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

#[tokio::test]
async fn text_description_uses_name_and_keywords() {
    let h = TestHarness::builder()
        .with_describer_responses(vec!["  A sturdy oak desk.  \n".into()])
        .build()
        .await
        .unwrap();

    let text = h
        .market
        .generate_description("Oak desk", "wood, drawers")
        .await
        .unwrap();
    assert_eq!(text, "A sturdy oak desk.");

    let prompts = h.describer.as_ref().unwrap().prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].prompt.contains("Oak desk"));
    assert!(prompts[0].prompt.contains("wood, drawers"));
    assert_eq!(prompts[0].image_bytes, None);
}

#[tokio::test]
async fn text_description_requires_a_name() {
    let h = TestHarness::builder().build().await.unwrap();
    let err = h.market.generate_description(" ", "x").await.unwrap_err();
    assert!(matches!(err, BazaarError::BadRequest(_)));
    assert!(h.describer.as_ref().unwrap().prompts().await.is_empty());
}

#[tokio::test]
async fn image_suggestion_parses_fenced_json() {
    let reply = "```json\n{\"name\": \"Film camera\", \"price\": \"¥12,800\", \
                 \"keywords\": [\"camera\", \"film\"], \"description\": \"Works well.\"}\n```";
    let h = TestHarness::builder()
        .with_describer_responses(vec![reply.into()])
        .build()
        .await
        .unwrap();

    let generated = h.market.generate_from_image(photo()).await.unwrap();
    assert_eq!(generated.name, "Film camera");
    assert_eq!(generated.price, 12800);
    assert_eq!(generated.keywords, "camera, film");
    assert_eq!(generated.description, "Works well.");

    let prompts = h.describer.as_ref().unwrap().prompts().await;
    assert_eq!(prompts[0].image_bytes, Some(4));
    assert_eq!(prompts[0].mime_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn image_suggestion_rejects_prose() {
    let h = TestHarness::builder()
        .with_describer_responses(vec!["Sorry, I cannot see the image.".into()])
        .build()
        .await
        .unwrap();
    let err = h.market.generate_from_image(photo()).await.unwrap_err();
    assert!(matches!(err, BazaarError::Provider { .. }));
}

#[tokio::test]
async fn provider_failures_surface_as_provider_errors() {
    let h = TestHarness::builder().build().await.unwrap();
    h.describer.as_ref().unwrap().add_failure("quota exceeded").await;
    let err = h.market.generate_description("Desk", "").await.unwrap_err();
    assert!(matches!(err, BazaarError::Provider { .. }));
}

#[tokio::test]
async fn missing_describer_is_unavailable() {
    let h = TestHarness::builder().without_describer().build().await.unwrap();
    assert!(!h.market.has_describer());

    let text = h.market.generate_description("Desk", "").await.unwrap_err();
    assert!(matches!(text, BazaarError::Unavailable(_)));
    let image = h.market.generate_from_image(photo()).await.unwrap_err();
    assert!(matches!(image, BazaarError::Unavailable(_)));
}
