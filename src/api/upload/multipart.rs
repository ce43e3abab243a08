// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing for photo uploads

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use tracing::debug;

use crate::api::errors::ApiError;

/// Fields accepted by the upload routes
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Bytes>,
    pub found_location: Option<String>,
}

impl UploadForm {
    /// The uploaded photo, or a validation error naming the `file` field
    pub fn require_file(&self) -> Result<&Bytes, ApiError> {
        match self.file {
            Some(ref bytes) if !bytes.is_empty() => Ok(bytes),
            Some(_) => Err(ApiError::validation("file", "file is empty")),
            None => Err(ApiError::validation("file", "file is required")),
        }
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::InvalidRequest(format!("Failed to read multipart body: {}", e.body_text()))
    }
}

/// Read `file` and the optional `foundLocation` text field; others are skipped
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(multipart_error)?;
                debug!("Received file: {} bytes", data.len());
                form.file = Some(data);
            }
            "foundLocation" | "found_location" => {
                let value = field.text().await.map_err(multipart_error)?;
                form.found_location = Some(value);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}
