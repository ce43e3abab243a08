// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures for integration tests
//!
//! Provides deterministic stand-ins for the detector and captioner so the
//! intake pipeline and HTTP API can be exercised without model files.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use lostfound_node::{
    api::http_server::{create_app, AppState},
    classification::CategoryClassifier,
    config::ServerConfig,
    intake::ItemIntake,
    storage::{ImageStore, SqliteItemStore},
    vision::{
        Captioner, CaptionService, Detection, DetectionResult, EncodedImage, ObjectDetector,
        VisionModelInfo,
    },
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Detector that reports a fixed set of detections for every image
pub struct FakeDetector {
    detections: Vec<Detection>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeDetector {
    pub fn seeing(label: &str, confidence: f32) -> Self {
        Self::with_detections(vec![Detection::new(label, confidence)])
    }

    pub fn with_detections(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_detections(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            detections: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ObjectDetector for FakeDetector {
    fn detect(&self, _image: &DynamicImage) -> Result<DetectionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("inference session crashed"));
        }
        Ok(DetectionResult::from_detections(self.detections.clone()))
    }
}

/// Captioner returning canned text
pub struct FakeCaptioner {
    pub title: String,
    pub description: String,
    pub fail: bool,
}

impl FakeCaptioner {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Captioner for FakeCaptioner {
    async fn title(&self, _image: &EncodedImage) -> Result<String> {
        if self.fail {
            return Err(anyhow!("sidecar timed out"));
        }
        Ok(self.title.clone())
    }

    async fn description(&self, _image: &EncodedImage) -> Result<String> {
        if self.fail {
            return Err(anyhow!("sidecar timed out"));
        }
        Ok(self.description.clone())
    }
}

/// Encode a small solid-colour image
pub fn encode_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |_, _| Rgb([30u8, 90u8, 200u8]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, format)
        .expect("Failed to encode test image");
    buffer.into_inner()
}

pub fn png_bytes() -> Vec<u8> {
    encode_image(ImageFormat::Png, 32, 24)
}

pub fn jpeg_bytes() -> Vec<u8> {
    encode_image(ImageFormat::Jpeg, 32, 24)
}

/// Intake pipeline over an in-memory store and a temporary upload dir
pub struct TestIntake {
    pub intake: ItemIntake,
    pub upload_dir: TempDir,
}

pub struct IntakeBuilder {
    detector: Option<Arc<dyn ObjectDetector>>,
    captions: CaptionService,
    classifier: CategoryClassifier,
}

impl IntakeBuilder {
    pub fn new() -> Self {
        Self {
            detector: None,
            captions: CaptionService::Unavailable,
            classifier: CategoryClassifier::default(),
        }
    }

    pub fn detector(mut self, detector: impl ObjectDetector + 'static) -> Self {
        self.detector = Some(Arc::new(detector));
        self
    }

    pub fn shared_detector(mut self, detector: Arc<dyn ObjectDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn captioner(mut self, captioner: impl Captioner + 'static) -> Self {
        self.captions = CaptionService::Available(Arc::new(captioner));
        self
    }

    pub fn classifier(mut self, classifier: CategoryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub async fn build(self) -> TestIntake {
        let upload_dir = TempDir::new().expect("Failed to create temp dir");
        let images = ImageStore::open(upload_dir.path())
            .await
            .expect("Failed to open image store");
        let store = SqliteItemStore::in_memory()
            .await
            .expect("Failed to open in-memory store");

        let intake = ItemIntake::new(
            self.detector,
            self.captions,
            self.classifier,
            Arc::new(store),
            images,
        );
        TestIntake { intake, upload_dir }
    }

    pub async fn build_state(self) -> (AppState, TempDir) {
        let TestIntake { intake, upload_dir } = self.build().await;
        let models = vec![VisionModelInfo {
            name: "fake-detector".to_string(),
            model_type: "detector".to_string(),
            available: intake.has_detector(),
        }];
        (AppState::new(intake, models), upload_dir)
    }
}

impl Default for IntakeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub const BOUNDARY: &str = "----lostfound-test-boundary";

/// One part of a hand-built multipart body
pub enum Part<'a> {
    File(&'a str, &'a [u8]),
    Text(&'a str, &'a str),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"photo.bin\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Router over `state` with default server settings
pub fn test_app(state: AppState) -> Router {
    create_app(state, &ServerConfig::default())
}

/// Send one request and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
