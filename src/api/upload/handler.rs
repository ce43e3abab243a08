// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Photo upload handlers

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::multipart::read_upload_form;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::items::LostItemResponse;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    /// Handle to pass to `/analyze-image` and `/create-lost-item`
    pub filename: String,
}

/// POST /upload - Store a photo and return its handle
///
/// # Request
/// - multipart field `file`: the photo (PNG, JPEG, WebP, GIF, BMP, TIFF)
///
/// # Errors
/// - 400 Bad Request: missing file or bytes that are not a decodable image
/// - 413 Payload Too Large: body over the configured limit
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let bytes = form.require_file()?;

    let filename = state.intake.upload(bytes).await?;
    Ok(Json(UploadResponse { filename }))
}

/// POST /submit-item - Upload, analyse and persist in a single request
///
/// # Request
/// - multipart field `file`: the photo
/// - multipart field `foundLocation`: where the item was found (optional)
///
/// # Errors
/// - 400 Bad Request: missing or invalid photo
/// - 503 Service Unavailable: detector not loaded
/// - 500 Internal Server Error: detection, captioning or database failure
pub async fn submit_item_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<LostItemResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let bytes = form.require_file()?;

    let item = state
        .intake
        .submit_item(bytes, form.found_location.clone())
        .await?;

    info!(
        "Submitted lost item {}: {:?} ({})",
        item.id, item.object_name, item.category
    );
    Ok(Json(item.into()))
}
