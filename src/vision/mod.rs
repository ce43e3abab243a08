// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for item photos
//!
//! This module provides:
//! - Object detection via YOLOv8 (ONNX, CPU)
//! - Title/description captioning via a VLM sidecar

pub mod captioner;
pub mod detector;
pub mod image_utils;
pub mod model_manager;
pub mod vlm_client;

pub use captioner::{Caption, CaptionService, Captioner};
pub use detector::{Detection, DetectionResult, ObjectDetector, YoloConfig, YoloDetector};
pub use image_utils::{decode_image_bytes, detect_format, EncodedImage, ImageError, ImageInfo};
pub use model_manager::{VisionModelConfig, VisionModelInfo, VisionModelManager};
pub use vlm_client::VlmCaptioner;
