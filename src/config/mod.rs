// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Built-in defaults, optionally overlaid by a TOML file; the CLI layer
//! applies flag and environment overrides on top.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::classification::{
    CategoryClassifier, CategoryKeywords, CategoryTable, DEFAULT_CONFIDENCE_THRESHOLD,
};
use crate::vision::detector::{DEFAULT_DETECTION_THRESHOLD, DEFAULT_NMS_IOU};
use crate::vision::{VisionModelConfig, YoloConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_database_url() -> String {
    "sqlite://lost_items.db".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_detector_model_path() -> Option<PathBuf> {
    Some(PathBuf::from("./models/yolov8n.onnx"))
}

fn default_detection_threshold() -> f32 {
    DEFAULT_DETECTION_THRESHOLD
}

fn default_nms_iou() -> f32 {
    DEFAULT_NMS_IOU
}

fn default_classifier_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_captioner_model() -> String {
    "qwen2-vl-2b-instruct".to_string()
}

fn default_captioner_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Request body limit for multipart uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allowed browser origins; empty means any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            upload_dir: default_upload_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisionConfig {
    #[serde(default = "default_detector_model_path")]
    pub detector_model_path: Option<PathBuf>,

    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f32,

    #[serde(default = "default_nms_iou")]
    pub nms_iou: f32,

    /// Minimum confidence for a label to pick a specific category
    #[serde(default = "default_classifier_threshold")]
    pub classifier_threshold: f32,

    /// OpenAI-compatible VLM base URL; captions fall back to placeholders without it
    #[serde(default)]
    pub captioner_endpoint: Option<String>,

    #[serde(default = "default_captioner_model")]
    pub captioner_model: String,

    #[serde(default = "default_captioner_timeout_secs")]
    pub captioner_timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            detector_model_path: default_detector_model_path(),
            detection_threshold: default_detection_threshold(),
            nms_iou: default_nms_iou(),
            classifier_threshold: default_classifier_threshold(),
            captioner_endpoint: None,
            captioner_model: default_captioner_model(),
            captioner_timeout_secs: default_captioner_timeout_secs(),
        }
    }
}

impl VisionConfig {
    pub fn model_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            detector_model_path: self.detector_model_path.clone(),
            detector: YoloConfig {
                confidence_threshold: self.detection_threshold,
                iou_threshold: self.nms_iou,
                ..YoloConfig::default()
            },
            captioner_endpoint: self.captioner_endpoint.clone(),
            captioner_model: self.captioner_model.clone(),
            captioner_timeout: Duration::from_secs(self.captioner_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub vision: VisionConfig,

    /// Replaces the built-in keyword table when set
    #[serde(default)]
    pub categories: Option<Vec<CategoryKeywords>>,
}

impl ServiceConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load from a TOML file and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("vision.detection_threshold", self.vision.detection_threshold),
            ("vision.nms_iou", self.vision.nms_iou),
            ("vision.classifier_threshold", self.vision.classifier_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn category_table(&self) -> CategoryTable {
        match &self.categories {
            Some(entries) => CategoryTable::new(entries.clone()),
            None => CategoryTable::reference(),
        }
    }

    pub fn classifier(&self) -> CategoryClassifier {
        CategoryClassifier::new(self.category_table(), self.vision.classifier_threshold)
    }
}
