// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost item request types

use serde::{Deserialize, Serialize};

use crate::intake::CreateItem;

/// Body of `POST /create-lost-item`
///
/// Title and description default to empty so that a missing field is
/// reported through the same validation path as a blank one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLostItemRequest {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Category wire name; `Other` when omitted
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub found_location: Option<String>,

    /// Handle returned by `/upload`
    #[serde(default)]
    pub filename: Option<String>,

    /// Detector label carried over from `/analyze-image`
    #[serde(default)]
    pub object_name: Option<String>,

    #[serde(default)]
    pub confidence: Option<f32>,
}

impl From<CreateLostItemRequest> for CreateItem {
    fn from(request: CreateLostItemRequest) -> Self {
        CreateItem {
            title: request.title,
            description: request.description,
            category: request.category,
            found_location: request.found_location,
            filename: request.filename,
            object_name: request.object_name,
            confidence: request.confidence,
        }
    }
}

/// Query string of `GET /lost-items`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default)]
    pub category: Option<String>,

    /// ISO-8601 lower bound on the creation time
    #[serde(default)]
    pub since: Option<String>,

    #[serde(default)]
    pub limit: Option<i64>,
}
