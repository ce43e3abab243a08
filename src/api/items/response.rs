// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost item response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::LostItem;

/// URL prefix under which stored photos are served
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Item record as returned over HTTP
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LostItemResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub found_location: Option<String>,
    pub filename: Option<String>,
    /// Relative URL of the stored photo
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
    pub confidence: Option<f32>,
    pub object_name: Option<String>,
}

impl From<LostItem> for LostItemResponse {
    fn from(item: LostItem) -> Self {
        let image_url = item
            .filename
            .as_ref()
            .map(|f| format!("{}/{}", UPLOADS_PREFIX, f));
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            category: item.category,
            found_location: item.found_location,
            filename: item.filename,
            image_url,
            added_at: item.added_at,
            confidence: item.confidence,
            object_name: item.object_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteItemResponse {
    pub deleted: bool,
    pub id: i64,
}
