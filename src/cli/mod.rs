// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::ServiceConfig;

/// Lost & Found item service
#[derive(Parser, Debug, Default)]
#[command(name = "lostfound-node")]
#[command(version)]
#[command(about = "Lost-and-found item registration service", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "LOSTFOUND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on (e.g., 0.0.0.0:8000)
    #[arg(long, env = "BIND_ADDR")]
    pub bind: Option<SocketAddr>,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory for uploaded photos
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// YOLOv8 ONNX model path
    #[arg(long, env = "DETECTOR_MODEL_PATH")]
    pub detector_model: Option<PathBuf>,

    /// OpenAI-compatible VLM endpoint for captions
    #[arg(long, env = "VLM_ENDPOINT")]
    pub vlm_endpoint: Option<String>,

    /// Model name sent to the VLM endpoint
    #[arg(long, env = "VLM_MODEL_NAME")]
    pub vlm_model: Option<String>,

    /// Comma-separated list of allowed CORS origins
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then overrides
    pub fn resolve_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ServiceConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(ref url) = self.database_url {
            config.storage.database_url = url.clone();
        }
        if let Some(ref dir) = self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }
        if let Some(ref path) = self.detector_model {
            config.vision.detector_model_path = Some(path.clone());
        }
        if let Some(ref endpoint) = self.vlm_endpoint {
            config.vision.captioner_endpoint = Some(endpoint.clone());
        }
        if let Some(ref model) = self.vlm_model {
            config.vision.captioner_model = model.clone();
        }
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !origins.is_empty() {
            config.server.cors_origins = origins;
        }

        config.validate()?;
        Ok(config)
    }
}
