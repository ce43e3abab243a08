// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SQLite-backed [`ItemStore`]

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

use super::item_store::{creation_timestamp, ItemFilter, ItemStore, LostItem, NewLostItem};

const COLUMNS: &str =
    "id, title, description, category, found_location, filename, added_at, confidence, object_name";

/// Fixed-width UTC format; lexicographic order equals time order
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored timestamp '{}'", raw))
}

#[derive(Debug, FromRow)]
struct LostItemRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    found_location: Option<String>,
    filename: Option<String>,
    added_at: String,
    confidence: Option<f64>,
    object_name: Option<String>,
}

impl TryFrom<LostItemRow> for LostItem {
    type Error = anyhow::Error;

    fn try_from(row: LostItemRow) -> Result<Self> {
        Ok(LostItem {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            found_location: row.found_location,
            filename: row.filename,
            added_at: parse_timestamp(&row.added_at)?,
            confidence: row.confidence.map(|c| c as f32),
            object_name: row.object_name,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open (or create) the database at `url` and run migrations
    pub async fn connect(url: &str) -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL '{}'", url))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await
            .with_context(|| format!("Failed to open database '{}'", url))?;

        info!("Opened item database at {}", url);
        Self::from_pool(pool).await
    }

    /// Private in-memory database; lives as long as the store
    pub async fn in_memory() -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // A single connection that never recycles keeps the memory DB alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await
            .context("Failed to open in-memory database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn create(&self, item: NewLostItem) -> Result<LostItem> {
        let added_at = creation_timestamp();
        let sql = format!(
            "INSERT INTO lost_items \
             (title, description, category, found_location, filename, added_at, confidence, object_name) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );

        let row: LostItemRow = sqlx::query_as(&sql)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.category)
            .bind(&item.found_location)
            .bind(&item.filename)
            .bind(format_timestamp(&added_at))
            .bind(item.confidence.map(f64::from))
            .bind(&item.object_name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert lost item")?;

        debug!("Inserted lost item {}", row.id);
        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<LostItem>> {
        let sql = format!("SELECT {} FROM lost_items WHERE id = ?", COLUMNS);
        let row: Option<LostItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch lost item {}", id))?;
        row.map(LostItem::try_from).transpose()
    }

    async fn list(&self, filter: &ItemFilter) -> Result<Vec<LostItem>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM lost_items WHERE 1 = 1", COLUMNS));

        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(since) = filter.since {
            qb.push(" AND added_at >= ").push_bind(format_timestamp(&since));
        }
        qb.push(" ORDER BY added_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows: Vec<LostItemRow> = qb
            .build_query_as::<LostItemRow>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list lost items")?;

        rows.into_iter().map(LostItem::try_from).collect()
    }

    async fn delete(&self, id: i64) -> Result<Option<LostItem>> {
        let sql = format!("DELETE FROM lost_items WHERE id = ? RETURNING {}", COLUMNS);
        let row: Option<LostItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to delete lost item {}", id))?;
        row.map(LostItem::try_from).transpose()
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lost_items")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count lost items")
    }
}
