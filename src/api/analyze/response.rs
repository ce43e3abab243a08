// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image response types

use serde::{Deserialize, Serialize};

use crate::intake::Analysis;
use crate::vision::detector::BoundingBox as DetectorBox;
use crate::vision::Detection;

/// Bounding box in original image pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<DetectorBox> for BoundingBox {
    fn from(b: DetectorBox) -> Self {
        Self {
            x: b.x1,
            y: b.y1,
            width: b.x2 - b.x1,
            height: b.y2 - b.y1,
        }
    }
}

/// A detected object in the photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl From<Detection> for DetectedObject {
    fn from(d: Detection) -> Self {
        Self {
            label: d.label,
            confidence: d.confidence,
            bounding_box: d.bbox.map(BoundingBox::from),
        }
    }
}

/// Preview returned by `POST /analyze-image`; nothing is stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageResponse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub object_name: Option<String>,
    pub confidence: Option<f32>,
    pub filename: String,
    pub detections: Vec<DetectedObject>,
}

impl From<Analysis> for AnalyzeImageResponse {
    fn from(analysis: Analysis) -> Self {
        Self {
            title: analysis.title,
            description: analysis.description,
            category: analysis.category.as_str().to_string(),
            object_name: analysis.object_name,
            confidence: analysis.confidence,
            filename: analysis.filename,
            detections: analysis
                .detections
                .into_iter()
                .map(DetectedObject::from)
                .collect(),
        }
    }
}
