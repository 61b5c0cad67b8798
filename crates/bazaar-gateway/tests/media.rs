// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed media links served by the gateway from a filesystem store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bazaar_config::model::{MarketConfig, MediaConfig};
use bazaar_core::MediaAdapter;
use bazaar_gateway::{GatewayState, HealthState, build_router};
use bazaar_market::Marketplace;
use bazaar_media::LocalMediaStore;
use bazaar_test_utils::{MockIdentity, MultipartBody, TestHarness};
use serde_json::Value;
use tower::ServiceExt;

const BASE: &str = "http://bazaar.test";

struct Fixture {
    _harness: TestHarness,
    _media_dir: tempfile::TempDir,
    store: Arc<LocalMediaStore>,
    app: Router,
}

async fn fixture() -> Fixture {
    let harness = TestHarness::builder().build().await.unwrap();
    let media_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalMediaStore::from_config(&MediaConfig {
        root_dir: media_dir.path().display().to_string(),
        public_base_url: BASE.into(),
        signing_key: Some("test-signing-key".into()),
        url_ttl_secs: 900,
    }));
    let market = Arc::new(Marketplace::new(
        harness.storage.clone(),
        store.clone(),
        None,
        MarketConfig::default(),
    ));
    let state = GatewayState {
        market,
        identity: Arc::new(MockIdentity::new()),
        media_files: Some(store.clone()),
        health: HealthState::new(Some(Arc::new(|| "bazaar_up 1\n".to_string()))),
    };
    Fixture {
        _harness: harness,
        _media_dir: media_dir,
        store,
        app: build_router(state, 1024 * 1024),
    }
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn signed_link_serves_the_object() {
    let f = fixture().await;
    let key = f
        .store
        .upload("products/p1_lamp.png", b"png-bytes".to_vec(), "image/png")
        .await
        .unwrap();
    let url = f.store.resolve_url(&key).await.unwrap();
    let path = url.strip_prefix(BASE).unwrap();

    let response = get(&f.app, path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::CONTENT_DISPOSITION], "inline");
    assert!(
        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .unwrap()
            .starts_with("private, max-age=")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"png-bytes");
}

#[tokio::test]
async fn tampered_or_unsigned_links_are_forbidden() {
    let f = fixture().await;
    f.store
        .upload("products/p1_lamp.png", b"png".to_vec(), "image/png")
        .await
        .unwrap();
    let url = f.store.resolve_url("products/p1_lamp.png").await.unwrap();
    let path = url.strip_prefix(BASE).unwrap();

    let other_key = path.replace("p1_lamp.png", "p2_lamp.png");
    assert_eq!(get(&f.app, &other_key).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        get(&f.app, "/media/products/p1_lamp.png").await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        get(&f.app, "/media/products/p1_lamp.png?expires=1&signature=00")
            .await
            .status(),
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn undecodable_signature_parameters_are_forbidden() {
    let f = fixture().await;
    let response = get(&f.app, "/media/products/p1_lamp.png?expires=soon&signature=00").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid or expired media link");
}

#[tokio::test]
async fn uploaded_svg_is_served_as_an_opaque_attachment() {
    let f = fixture().await;
    let token = format!("Bearer {}", MockIdentity::token_for("seller"));
    let register = Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Seller"}"#))
        .unwrap();
    assert_eq!(
        f.app.clone().oneshot(register).await.unwrap().status(),
        StatusCode::OK
    );

    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;
    let form = MultipartBody::new()
        .text("name", "Poster")
        .text("price", "300")
        .file("image", "x.svg", "image/svg+xml", svg);
    let create = Request::builder()
        .method("POST")
        .uri("/products")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, form.content_type())
        .body(Body::from(form.finish()))
        .unwrap();
    let response = f.app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let listing: Value = serde_json::from_slice(&bytes).unwrap();
    let url = listing["image_url"].as_str().unwrap();
    let path = url.strip_prefix(BASE).unwrap();

    let response = get(&f.app, path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::CONTENT_DISPOSITION], "attachment");
}

#[tokio::test]
async fn signed_link_to_missing_object_is_not_found() {
    let f = fixture().await;
    let url = f.store.resolve_url("products/never_uploaded.jpg").await.unwrap();
    let path = url.strip_prefix(BASE).unwrap();
    assert_eq!(get(&f.app, path).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_render_when_enabled() {
    let f = fixture().await;
    let response = get(&f.app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"bazaar_up 1\n");
}
