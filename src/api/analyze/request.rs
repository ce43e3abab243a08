// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Body of `POST /analyze-image`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    /// Handle returned by `/upload`
    #[serde(default)]
    pub filename: String,
}

impl AnalyzeImageRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.filename.trim().is_empty() {
            return Err(ApiError::validation("filename", "filename is required"));
        }
        Ok(())
    }
}
