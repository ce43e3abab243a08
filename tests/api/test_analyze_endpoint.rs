// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze-image tests, including the full split flow

use crate::common::{
    json_request, multipart_request, png_bytes, send, test_app, FakeCaptioner, FakeDetector,
    IntakeBuilder, Part,
};
use axum::http::{Method, StatusCode};
use axum::Router;
use lostfound_node::vision::Detection;
use serde_json::json;

async fn upload(app: &Router) -> String {
    let png = png_bytes();
    let (status, body) = send(app, multipart_request("/upload", &[Part::File("file", &png)])).await;
    assert_eq!(status, StatusCode::OK);
    body["filename"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_analyze_returns_preview() {
    let (state, _dir) = IntakeBuilder::new()
        .detector(FakeDetector::with_detections(vec![
            Detection::new("cup", 0.7),
            Detection::new("dining table", 0.3),
        ]))
        .captioner(FakeCaptioner::new("White mug", "White ceramic mug with a logo."))
        .build_state()
        .await;
    let app = test_app(state);
    let filename = upload(&app).await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": filename})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Personal");
    assert_eq!(body["objectName"], "cup");
    assert_eq!(body["title"], "White mug");
    assert_eq!(body["filename"], filename.as_str());
    assert_eq!(body["detections"].as_array().unwrap().len(), 2);

    let (_, listed) = send(&app, crate::common::empty_request(Method::GET, "/lost-items")).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_nothing_detected() {
    let (state, _dir) = IntakeBuilder::new()
        .detector(FakeDetector::empty())
        .build_state()
        .await;
    let app = test_app(state);
    let filename = upload(&app).await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": filename})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Other");
    assert!(body["objectName"].is_null());
    assert!(body["confidence"].is_null());
}

#[tokio::test]
async fn test_split_flow_creates_item_with_image_url() {
    let (state, _dir) = IntakeBuilder::new()
        .detector(FakeDetector::seeing("skateboard", 0.81))
        .captioner(FakeCaptioner::new("Skateboard", "Blue skateboard with worn grip tape."))
        .build_state()
        .await;
    let app = test_app(state);
    let filename = upload(&app).await;

    let (_, preview) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": filename})),
    )
    .await;

    let create = json!({
        "title": preview["title"],
        "description": "Blue skateboard, left by the fountain",
        "category": preview["category"],
        "filename": preview["filename"],
        "objectName": preview["objectName"],
        "confidence": preview["confidence"],
        "foundLocation": "Fountain"
    });
    let (status, item) = send(&app, json_request(Method::POST, "/create-lost-item", &create)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["category"], "Sports Equipment");
    assert_eq!(item["imageUrl"], format!("/uploads/{}", filename));
    assert_eq!(item["description"], "Blue skateboard, left by the fountain");
}

#[tokio::test]
async fn test_analyze_errors() {
    let (state, _dir) = IntakeBuilder::new()
        .detector(FakeDetector::seeing("tie", 0.9))
        .build_state()
        .await;
    let app = test_app(state);

    let (status, body) = send(&app, json_request(Method::POST, "/analyze-image", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "filename");

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": "../secrets.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": "gone.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorType"], "not_found");
}

#[tokio::test]
async fn test_analyze_without_detector() {
    let (state, _dir) = IntakeBuilder::new().build_state().await;
    let app = test_app(state);
    let filename = upload(&app).await;

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/analyze-image", &json!({"filename": filename})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
