// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost item CRUD handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{debug, info};

use super::request::{CreateLostItemRequest, ListItemsQuery};
use super::response::{DeleteItemResponse, LostItemResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::intake::build_filter;

/// POST /create-lost-item - Persist an item from (possibly edited) analysis fields
///
/// # Errors
/// - 400 Bad Request: blank title/description, unknown category, bad filename
/// - 500 Internal Server Error: database failure
pub async fn create_lost_item_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateLostItemRequest>,
) -> Result<Json<LostItemResponse>, ApiError> {
    debug!("Create lost item request: {:?}", request.title);

    let item = state.intake.create_item(request.into()).await?;
    Ok(Json(item.into()))
}

/// GET /lost-items - List items newest first
///
/// Query: `category` (wire name), `since` (ISO-8601), `limit` (1 to 500)
pub async fn list_lost_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<LostItemResponse>>, ApiError> {
    let filter = build_filter(
        query.category.as_deref(),
        query.since.as_deref(),
        query.limit,
    )?;

    let items = state.intake.list_items(&filter).await?;
    Ok(Json(items.into_iter().map(LostItemResponse::from).collect()))
}

/// GET /lost-items/:id
pub async fn get_lost_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LostItemResponse>, ApiError> {
    let item = state.intake.get_item(id).await?;
    Ok(Json(item.into()))
}

/// DELETE /lost-items/:id - Remove the record and its photo
pub async fn delete_lost_item_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    let item = state.intake.delete_item(id).await?;
    info!("Lost item {} deleted via API", item.id);
    Ok(Json(DeleteItemResponse {
        deleted: true,
        id: item.id,
    }))
}
