// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detector
//!
//! Runs an Ultralytics YOLOv8 ONNX export (COCO classes) on CPU.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::postprocessing::{decode_predictions, into_detections, non_max_suppression};
use super::preprocessing::{letterbox, YOLO_INPUT_SIZE};
use super::{DetectionResult, ObjectDetector, DEFAULT_DETECTION_THRESHOLD, DEFAULT_NMS_IOU};

/// Detector tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloConfig {
    /// Minimum class score for a detection to be reported
    pub confidence_threshold: f32,
    /// IoU above which same-class boxes are suppressed
    pub iou_threshold: f32,
    pub intra_threads: usize,
}

impl Default for YoloConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_DETECTION_THRESHOLD,
            iou_threshold: DEFAULT_NMS_IOU,
            intra_threads: 4,
        }
    }
}

/// YOLOv8 detector backed by an ONNX Runtime session
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    input_name: String,
    config: YoloConfig,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load the detector from an ONNX file
    ///
    /// # Errors
    /// Returns error if the model file is missing or ONNX Runtime rejects it.
    pub fn new<P: AsRef<Path>>(model_path: P, config: YoloConfig) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("YOLO model not found: {}", model_path.display());
        }

        info!("Loading YOLO detector from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load YOLO model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("YOLO detector input: {}", input_name);
        info!("✅ YOLO detector loaded (CPU-only)");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            config,
        })
    }

    pub fn config(&self) -> &YoloConfig {
        &self.config
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<DetectionResult> {
        let (tensor, geometry) = letterbox(image, YOLO_INPUT_SIZE);

        let input_value = Value::from_array(tensor).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("YOLO session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("YOLO inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;
        debug!("YOLO output shape: {:?}", output_tensor.shape());

        let candidates = decode_predictions(
            output_tensor.view(),
            self.config.confidence_threshold,
            &geometry,
        )?;
        let kept = non_max_suppression(candidates, self.config.iou_threshold);
        let result = DetectionResult::from_detections(into_detections(kept));

        debug!(
            "YOLO detected {} objects (best: {:?} @ {:.3})",
            result.all_detections.len(),
            result.label,
            result.confidence
        );

        Ok(result)
    }
}
