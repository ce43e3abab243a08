// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image endpoint handler

use axum::{extract::State, Json};
use tracing::{debug, info, warn};

use super::request::AnalyzeImageRequest;
use super::response::AnalyzeImageResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /analyze-image - Detect, classify and caption an uploaded photo
///
/// # Request
/// - `filename`: handle returned by `/upload` (required)
///
/// # Response
/// - `title`, `description`: captioner output (placeholders when no captioner)
/// - `category`: classified category wire name
/// - `objectName`, `confidence`: best detection, null when nothing was detected
/// - `detections`: every thresholded detection, best first
///
/// # Errors
/// - 400 Bad Request: missing or malformed filename
/// - 404 Not Found: no stored photo under that filename
/// - 503 Service Unavailable: detector not loaded
/// - 500 Internal Server Error: detection or captioning failed
pub async fn analyze_image_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeImageRequest>,
) -> Result<Json<AnalyzeImageResponse>, ApiError> {
    debug!("Analyze request for {}", request.filename);

    // 1. Validate request
    if let Err(e) = request.validate() {
        warn!("Analyze validation failed: {}", e);
        return Err(e);
    }

    // 2. Run the pipeline
    let analysis = state.intake.analyze(request.filename.trim()).await?;

    info!(
        "Analysis complete for {}: {:?} -> {}",
        analysis.filename, analysis.object_name, analysis.category
    );

    // 3. Convert to response format
    Ok(Json(analysis.into()))
}
