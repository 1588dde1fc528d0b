// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error handling tests for POST /extract-text
//!
//! Every failure must come back as `{"error": ...}` with the right status,
//! must never reach the engine when the request itself is wrong, and must not
//! leave staged files behind.

use super::support::*;
use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use image::RgbImage;
use mockall::mock;
use std::path::Path;
use std::sync::Arc;
use text_extractor::vision::{Detection, TextRecognizer};
use tower::ServiceExt; // for `oneshot`

mock! {
    pub Recognizer {}

    impl TextRecognizer for Recognizer {
        fn name(&self) -> &str;
        fn languages(&self) -> &[String];
        fn recognize_image(&self, image: &RgbImage) -> Result<Vec<Detection>>;
        fn recognize_file(&self, path: &Path) -> Result<Vec<Detection>>;
    }
}

/// A recognizer that must never be called
fn untouched_recognizer() -> MockRecognizer {
    let mut mock = MockRecognizer::new();
    mock.expect_name().return_const("mock".to_string());
    mock.expect_languages().return_const(Vec::<String>::new());
    mock.expect_recognize_file().times(0);
    mock.expect_recognize_image().times(0);
    mock
}

async fn error_message(response: axum::response::Response) -> String {
    let json = body_json(response).await;
    assert_eq!(
        json.as_object().map(|o| o.len()),
        Some(1),
        "error body has a single field: {}",
        json
    );
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_missing_image_field() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part {
            name: "file",
            filename: Some("note.png"),
            content_type: Some("image/png"),
            data: solid_png(4, 4, [0, 0, 0]),
        }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No image file provided");
}

#[tokio::test]
async fn test_image_field_without_file() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::text("image", "not a file")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No image file provided");
}

#[tokio::test]
async fn test_empty_filename() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image("", Vec::new())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No file selected");
}

#[tokio::test]
async fn test_non_multipart_request() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));

    let request = Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"image":"aGVsbG8="}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No image file provided");
}

#[tokio::test]
async fn test_non_image_bytes() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image(
            "notes.png",
            b"this is plain text pretending to be a picture".to_vec(),
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response).await;
    assert!(
        message.starts_with("Failed to extract text:"),
        "unexpected message: {}",
        message
    );
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn test_truncated_png() {
    let app = TestApp::new(Arc::new(untouched_recognizer()));
    let mut png = solid_png(32, 32, [10, 20, 30]);
    png.truncate(24);

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image("broken.png", png)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response)
        .await
        .starts_with("Failed to extract text:"));
}

#[tokio::test]
async fn test_engine_failure() {
    let mut mock = MockRecognizer::new();
    mock.expect_name().return_const("mock".to_string());
    mock.expect_languages().return_const(Vec::<String>::new());
    mock.expect_recognize_file()
        .times(1)
        .returning(|path| {
            assert!(path.exists());
            Err(anyhow!("inference session crashed"))
        });

    let app = TestApp::new(Arc::new(mock));

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image("doc.png", solid_png(8, 8, [1, 1, 1]))]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response).await;
    assert!(message.starts_with("Failed to extract text:"));
    assert!(message.contains("inference session crashed"));
    assert_eq!(app.staged_file_count(), 0, "staged file removed after failure");
}

#[tokio::test]
async fn test_declared_length_over_limit() {
    let app = TestApp::with_limit(Arc::new(untouched_recognizer()), 1024);

    let body = multipart_body(&[Part::image("big.png", vec![0u8; 4096])]);
    let request = Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        error_message(response).await,
        "Upload exceeds the maximum request size of 1024 bytes"
    );
}

#[tokio::test]
async fn test_streamed_body_over_limit() {
    let app = TestApp::with_limit(Arc::new(untouched_recognizer()), 1024);

    // No Content-Length header; the limit is enforced while reading the part
    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image("big.png", vec![0u8; 8192])]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(error_message(response).await.contains("1024 bytes"));
}

#[tokio::test]
async fn test_upload_within_limit_succeeds() {
    let app = TestApp::with_limit(
        Arc::new(FixedRecognizer::new(vec![detection("small", 0.5)])),
        64 * 1024,
    );

    let response = app
        .router
        .clone()
        .oneshot(extract_request(&[Part::image("small.png", solid_png(4, 4, [0, 0, 0]))]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
