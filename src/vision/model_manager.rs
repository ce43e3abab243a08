// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager for loading the detector and captioner at startup

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::vision::captioner::CaptionService;
use crate::vision::detector::{ObjectDetector, YoloConfig, YoloDetector};
use crate::vision::vlm_client::{VlmCaptioner, DEFAULT_VLM_TIMEOUT_SECS};

/// Configuration for loading vision models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Path to the YOLOv8 ONNX export (optional)
    pub detector_model_path: Option<PathBuf>,
    pub detector: YoloConfig,
    /// Base URL of the OpenAI-compatible VLM sidecar (optional)
    pub captioner_endpoint: Option<String>,
    pub captioner_model: String,
    pub captioner_timeout: Duration,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            detector_model_path: Some(PathBuf::from("./models/yolov8n.onnx")),
            detector: YoloConfig::default(),
            captioner_endpoint: None,
            captioner_model: "qwen2-vl-2b-instruct".to_string(),
            captioner_timeout: Duration::from_secs(DEFAULT_VLM_TIMEOUT_SECS),
        }
    }
}

/// Information about a loaded vision model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionModelInfo {
    pub name: String,
    /// Model type (detector, captioner)
    pub model_type: String,
    pub available: bool,
}

/// Holds the detector and captioner chosen at startup
///
/// Missing or unreachable models are logged and left out; the service keeps
/// running with reduced capability.
#[derive(Clone)]
pub struct VisionModelManager {
    detector: Option<Arc<dyn ObjectDetector>>,
    caption_service: CaptionService,
    detector_name: String,
    captioner_name: String,
}

impl VisionModelManager {
    /// Load models from configuration
    pub async fn new(config: VisionModelConfig) -> anyhow::Result<Self> {
        let detector: Option<Arc<dyn ObjectDetector>> = if let Some(ref path) =
            config.detector_model_path
        {
            match YoloDetector::new(path, config.detector) {
                Ok(model) => {
                    tracing::info!("✅ YOLO detector loaded from {}", path.display());
                    Some(Arc::new(model))
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Failed to load YOLO detector from {}: {:#}",
                        path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        let caption_service = if let Some(ref endpoint) = config.captioner_endpoint {
            let captioner =
                VlmCaptioner::new(endpoint, &config.captioner_model, config.captioner_timeout)?;
            if captioner.health_check().await {
                tracing::info!("✅ VLM captioner reachable at {}", endpoint);
                CaptionService::Available(Arc::new(captioner))
            } else {
                tracing::warn!(
                    "⚠️ VLM captioner at {} is not reachable, using placeholder captions",
                    endpoint
                );
                CaptionService::Unavailable
            }
        } else {
            tracing::warn!("⚠️ No VLM captioner configured, using placeholder captions");
            CaptionService::Unavailable
        };

        let detector_name = config
            .detector_model_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yolov8".to_string());

        Ok(Self {
            detector,
            caption_service,
            detector_name,
            captioner_name: config.captioner_model,
        })
    }

    /// Assemble a manager from already-built models
    pub fn from_parts(
        detector: Option<Arc<dyn ObjectDetector>>,
        caption_service: CaptionService,
    ) -> Self {
        Self {
            detector,
            caption_service,
            detector_name: "detector".to_string(),
            captioner_name: "captioner".to_string(),
        }
    }

    pub fn detector(&self) -> Option<Arc<dyn ObjectDetector>> {
        self.detector.clone()
    }

    pub fn caption_service(&self) -> CaptionService {
        self.caption_service.clone()
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn has_captioner(&self) -> bool {
        self.caption_service.is_available()
    }

    /// List all vision models and their availability
    pub fn list_models(&self) -> Vec<VisionModelInfo> {
        vec![
            VisionModelInfo {
                name: self.detector_name.clone(),
                model_type: "detector".to_string(),
                available: self.has_detector(),
            },
            VisionModelInfo {
                name: self.captioner_name.clone(),
                model_type: "captioner".to_string(),
                available: self.has_captioner(),
            },
        ]
    }
}
