// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persistent lost-item records

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::classification::Category;

/// A stored lost item
///
/// `added_at` is assigned by the store at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LostItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub found_location: Option<String>,
    /// Stored image handle, if any
    pub filename: Option<String>,
    pub added_at: DateTime<Utc>,
    pub confidence: Option<f32>,
    pub object_name: Option<String>,
}

/// Fields supplied when creating an item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewLostItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub found_location: Option<String>,
    pub filename: Option<String>,
    pub confidence: Option<f32>,
    pub object_name: Option<String>,
}

/// Listing filter; unset fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub category: Option<Category>,
    /// Inclusive lower bound on `added_at`
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

/// Creation timestamp at the precision the store keeps (microseconds)
pub fn creation_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item, assigning `id` and `added_at`
    async fn create(&self, item: NewLostItem) -> Result<LostItem>;

    async fn get(&self, id: i64) -> Result<Option<LostItem>>;

    /// Matching items, newest first
    async fn list(&self, filter: &ItemFilter) -> Result<Vec<LostItem>>;

    /// Remove an item, returning the deleted record if it existed
    async fn delete(&self, id: i64) -> Result<Option<LostItem>>;

    async fn count(&self) -> Result<i64>;
}
