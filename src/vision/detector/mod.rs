// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection for uploaded photos
//!
//! The detector is a black box behind [`ObjectDetector`]; the shipped
//! implementation runs a YOLOv8 ONNX export on CPU.

pub mod coco;
pub mod postprocessing;
pub mod preprocessing;
pub mod yolo;

use image::DynamicImage;
use serde::Serialize;

pub use yolo::{YoloConfig, YoloDetector};

/// Default minimum confidence for a detection to be reported
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 0.65;

/// Default IoU above which overlapping same-class boxes are suppressed
pub const DEFAULT_NMS_IOU: f32 = 0.7;

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One thresholded detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: None,
        }
    }
}

/// Outcome of running the detector over one image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub detected: bool,
    pub label: Option<String>,
    pub confidence: f32,
    pub all_detections: Vec<Detection>,
}

impl DetectionResult {
    /// Nothing passed the threshold
    pub fn none() -> Self {
        Self {
            detected: false,
            label: None,
            confidence: 0.0,
            all_detections: Vec::new(),
        }
    }

    /// Best detection leads; the rest are kept in descending confidence order.
    pub fn from_detections(mut detections: Vec<Detection>) -> Self {
        detections.retain(|d| !d.confidence.is_nan());
        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        match detections.first() {
            Some(best) => Self {
                detected: true,
                label: Some(best.label.clone()),
                confidence: best.confidence,
                all_detections: detections,
            },
            None => Self::none(),
        }
    }
}

/// Image to object label + confidence
#[cfg_attr(test, mockall::automock)]
pub trait ObjectDetector: Send + Sync {
    /// Blocking inference; callers on the async runtime wrap this in
    /// `spawn_blocking`.
    fn detect(&self, image: &DynamicImage) -> anyhow::Result<DetectionResult>;
}
